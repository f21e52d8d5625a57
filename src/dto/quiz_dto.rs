use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::quiz::{Question, Quiz};
use crate::utils::nullable::null_as_default;

/// Inbound quiz document. Client-supplied ids are ignored; absent or null
/// fields take their zero value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateQuizPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub questions: Vec<CreateQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateQuestion {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub question_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answers: Vec<i64>,
}

impl CreateQuizPayload {
    pub fn from_yaml(raw: &[u8]) -> serde_yaml::Result<Self> {
        serde_yaml::from_slice(raw)
    }

    pub fn into_quiz(self, id: String) -> Quiz {
        Quiz {
            id,
            title: self.title,
            questions: assign_question_ids(self.questions),
        }
    }
}

fn assign_question_ids(questions: Vec<CreateQuestion>) -> Vec<Question> {
    questions
        .into_iter()
        .enumerate()
        .map(|(idx, q)| Question {
            id: (idx as u32) + 1,
            text: q.text,
            code: q.code.filter(|code| !code.trim().is_empty()),
            question_type: q.question_type,
            options: q.options,
            answers: q.answers,
        })
        .collect()
}
