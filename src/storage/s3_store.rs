use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::{quiz_id_from_key, quiz_key, QuizStore, QUIZ_KEY_PREFIX};
use crate::error::{Error, Result};
use crate::models::quiz::{Quiz, QuizSummary};

/// Stores each quiz as the object `quiz-<id>.yaml` in one bucket.
///
/// The credentials need `s3:PutObject`, `s3:GetObject`, `s3:DeleteObject` and
/// `s3:ListBucket` on the bucket. Without `s3:ListBucket`, S3 answers
/// `HeadObject` on a missing key with 403 rather than 404, so deleting an
/// unknown quiz surfaces as a server error instead of not found.
#[derive(Clone, Debug)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Builds a client from the default credential chain for `region`.
    pub async fn connect(bucket: &str, region: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        tracing::info!(bucket, region, "using s3 quiz store");
        Self::new(Client::new(&sdk_config), bucket)
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;
        loop {
            tracing::debug!(bucket = %self.bucket, "listing objects");
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(QUIZ_KEY_PREFIX)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .inspect_err(|error| tracing::error!(%error, "failed to list objects"))?;

            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .filter(|key| quiz_id_from_key(key).is_some())
                    .map(str::to_owned),
            );

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_owned());
                }
                _ => break,
            }
        }
        keys.sort();
        Ok(keys)
    }
}

fn not_found(id: &str) -> Error {
    Error::NotFound(format!("no quiz with id {}", id))
}

#[async_trait]
impl QuizStore for S3Store {
    fn backend(&self) -> &'static str {
        "s3"
    }

    async fn put(&self, quiz: &Quiz) -> Result<()> {
        let key = quiz_key(&quiz.id);
        let document = quiz.to_yaml()?;
        tracing::trace!(key, "putting object");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("application/yaml")
            .body(ByteStream::from(document.into_bytes()))
            .send()
            .await
            .inspect_err(|error| tracing::error!(%error, key, "failed to put object"))?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Quiz> {
        let key = quiz_key(id);
        tracing::trace!(key, "getting object");
        let object = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(object) => object,
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|service_err| service_err.is_no_such_key())
                {
                    return Err(not_found(id));
                }
                tracing::error!(error = %err, key, "failed to get object");
                return Err(err.into());
            }
        };
        let bytes = object.body.collect().await?.into_bytes();
        Ok(Quiz::from_yaml(&bytes)?)
    }

    async fn list(&self) -> Result<Vec<QuizSummary>> {
        let keys = self.list_keys().await?;
        let mut summaries = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(id) = quiz_id_from_key(&key) else {
                continue;
            };
            match self.get(id).await {
                Ok(quiz) => summaries.push(QuizSummary {
                    id: id.to_string(),
                    title: quiz.title,
                }),
                Err(Error::NotFound(_)) => {
                    tracing::debug!(key, "object removed while listing");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(summaries)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let key = quiz_key(id);
        // DeleteObject succeeds for missing keys, so check existence first.
        if let Err(err) = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            if err
                .as_service_error()
                .is_some_and(|service_err| service_err.is_not_found())
            {
                return Err(not_found(id));
            }
            if err.raw_response().map(|resp| resp.status().as_u16()) == Some(403) {
                tracing::error!(
                    error = %err,
                    key,
                    "head object denied; s3:ListBucket is needed to tell missing quizzes apart"
                );
            } else {
                tracing::error!(error = %err, key, "failed to head object");
            }
            return Err(err.into());
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .inspect_err(|error| tracing::error!(%error, key, "failed to delete object"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::Credentials;
    use aws_sdk_s3::operation::delete_object::DeleteObjectOutput;
    use aws_sdk_s3::operation::get_object::{GetObjectError, GetObjectOutput};
    use aws_sdk_s3::operation::head_object::{HeadObjectError, HeadObjectOutput};
    use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
    use aws_sdk_s3::operation::put_object::PutObjectOutput;
    use aws_sdk_s3::types::error::{NoSuchKey, NotFound};
    use aws_sdk_s3::types::Object;
    use aws_smithy_mocks::{mock, mock_client, RuleMode};
    use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
    use aws_smithy_runtime_api::http::StatusCode;
    use aws_smithy_types::body::SdkBody;

    const BUCKET: &str = "quiz-bucket";

    fn document(id: &str, title: &str) -> GetObjectOutput {
        GetObjectOutput::builder()
            .body(ByteStream::from(
                format!("id: '{}'\ntitle: {}\nquestions: []\n", id, title).into_bytes(),
            ))
            .build()
    }

    fn objects(keys: &[&str]) -> Vec<Object> {
        keys.iter()
            .map(|key| Object::builder().key(*key).build())
            .collect()
    }

    #[test]
    fn reports_backend_name() {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(crate::config::DEFAULT_REGION))
            .credentials_provider(Credentials::new("test", "test", None, None, "static"))
            .build();
        let store = S3Store::new(Client::from_conf(config), BUCKET);
        assert_eq!(store.backend(), "s3");
        assert_eq!(store.bucket, BUCKET);
    }

    #[tokio::test]
    async fn put_writes_yaml_under_quiz_key() {
        let put = mock!(Client::put_object)
            .match_requests(|req| {
                req.bucket() == Some(BUCKET)
                    && req.key() == Some("quiz-7.yaml")
                    && req.content_type() == Some("application/yaml")
            })
            .then_output(|| PutObjectOutput::builder().build());
        let store = S3Store::new(mock_client!(aws_sdk_s3, RuleMode::MatchAny, [&put]), BUCKET);

        let quiz = Quiz {
            id: "7".into(),
            title: "Seven".into(),
            questions: Vec::new(),
        };
        store.put(&quiz).await.unwrap();
        assert_eq!(put.num_calls(), 1);
    }

    #[tokio::test]
    async fn get_reads_document_and_maps_missing_key() {
        let present = mock!(Client::get_object)
            .match_requests(|req| req.key() == Some("quiz-1.yaml"))
            .then_output(|| document("1", "One"));
        let missing = mock!(Client::get_object)
            .match_requests(|req| req.key() == Some("quiz-2.yaml"))
            .then_error(|| GetObjectError::NoSuchKey(NoSuchKey::builder().build()));
        let store = S3Store::new(
            mock_client!(aws_sdk_s3, RuleMode::MatchAny, [&present, &missing]),
            BUCKET,
        );

        let quiz = store.get("1").await.unwrap();
        assert_eq!(quiz.title, "One");
        assert!(matches!(store.get("2").await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_of_missing_key_is_not_found_without_deleting() {
        let head = mock!(Client::head_object)
            .then_error(|| HeadObjectError::NotFound(NotFound::builder().build()));
        let delete = mock!(Client::delete_object)
            .then_output(|| DeleteObjectOutput::builder().build());
        let store = S3Store::new(
            mock_client!(aws_sdk_s3, RuleMode::MatchAny, [&head, &delete]),
            BUCKET,
        );

        assert!(matches!(store.delete("5").await, Err(Error::NotFound(_))));
        assert_eq!(head.num_calls(), 1);
        assert_eq!(delete.num_calls(), 0);
    }

    #[tokio::test]
    async fn delete_of_existing_key_removes_it() {
        let head = mock!(Client::head_object)
            .match_requests(|req| req.key() == Some("quiz-5.yaml"))
            .then_output(|| HeadObjectOutput::builder().build());
        let delete = mock!(Client::delete_object)
            .match_requests(|req| req.bucket() == Some(BUCKET) && req.key() == Some("quiz-5.yaml"))
            .then_output(|| DeleteObjectOutput::builder().build());
        let store = S3Store::new(
            mock_client!(aws_sdk_s3, RuleMode::MatchAny, [&head, &delete]),
            BUCKET,
        );

        store.delete("5").await.unwrap();
        assert_eq!(delete.num_calls(), 1);
    }

    #[tokio::test]
    async fn denied_head_is_a_server_error() {
        let head = mock!(Client::head_object).then_http_response(|| {
            HttpResponse::new(StatusCode::try_from(403).unwrap(), SdkBody::empty())
        });
        let delete = mock!(Client::delete_object)
            .then_output(|| DeleteObjectOutput::builder().build());
        let store = S3Store::new(
            mock_client!(aws_sdk_s3, RuleMode::MatchAny, [&head, &delete]),
            BUCKET,
        );

        let err = store.delete("5").await.unwrap_err();
        assert!(matches!(err, Error::ObjectStore(_)));
        assert_eq!(err.status().as_u16(), 500);
        assert_eq!(delete.num_calls(), 0);
    }

    #[tokio::test]
    async fn list_follows_continuation_tokens_and_sorts_keys() {
        let first_page = mock!(Client::list_objects_v2)
            .match_requests(|req| {
                req.prefix() == Some(QUIZ_KEY_PREFIX) && req.continuation_token().is_none()
            })
            .then_output(|| {
                ListObjectsV2Output::builder()
                    .set_contents(Some(objects(&["quiz-300.yaml", "notes.txt"])))
                    .is_truncated(true)
                    .next_continuation_token("page-2")
                    .build()
            });
        let second_page = mock!(Client::list_objects_v2)
            .match_requests(|req| req.continuation_token() == Some("page-2"))
            .then_output(|| {
                ListObjectsV2Output::builder()
                    .set_contents(Some(objects(&[
                        "quiz-100.yaml",
                        "quiz-abc.yaml",
                        "quiz-200.yaml",
                    ])))
                    .is_truncated(false)
                    .build()
            });
        let first = mock!(Client::get_object)
            .match_requests(|req| req.key() == Some("quiz-100.yaml"))
            .then_output(|| document("100", "First"));
        let removed = mock!(Client::get_object)
            .match_requests(|req| req.key() == Some("quiz-200.yaml"))
            .then_error(|| GetObjectError::NoSuchKey(NoSuchKey::builder().build()));
        let third = mock!(Client::get_object)
            .match_requests(|req| req.key() == Some("quiz-300.yaml"))
            .then_output(|| document("999", "Third"));
        let store = S3Store::new(
            mock_client!(
                aws_sdk_s3,
                RuleMode::MatchAny,
                [&first_page, &second_page, &first, &removed, &third]
            ),
            BUCKET,
        );

        assert_eq!(
            store.list().await.unwrap(),
            vec![
                QuizSummary {
                    id: "100".into(),
                    title: "First".into()
                },
                QuizSummary {
                    id: "300".into(),
                    title: "Third".into()
                },
            ]
        );
        assert_eq!(first_page.num_calls(), 1);
        assert_eq!(second_page.num_calls(), 1);
        assert_eq!(removed.num_calls(), 1);
    }
}
