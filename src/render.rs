use std::sync::OnceLock;

use tera::{Context, Tera};

use crate::error::Result;
use crate::models::quiz::{Quiz, QuizSummary};

const QUIZ_LIST_TEMPLATE: &str = "quizzes.html";

static TEMPLATES: OnceLock<Tera> = OnceLock::new();

fn templates() -> Result<&'static Tera> {
    if let Some(tera) = TEMPLATES.get() {
        return Ok(tera);
    }
    let mut tera = Tera::default();
    tera.add_raw_template(
        QUIZ_LIST_TEMPLATE,
        include_str!("../templates/quizzes.html"),
    )?;
    Ok(TEMPLATES.get_or_init(|| tera))
}

/// HTML listing page with a link and a delete control per quiz.
pub fn quiz_list_page(quizzes: &[QuizSummary]) -> Result<String> {
    let mut context = Context::new();
    context.insert("quizzes", quizzes);
    Ok(templates()?.render(QUIZ_LIST_TEMPLATE, &context)?)
}

/// Plain-text body for a single quiz: the stored YAML document.
pub fn quiz_document(quiz: &Quiz) -> Result<String> {
    Ok(quiz.to_yaml()?)
}
