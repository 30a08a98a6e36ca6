//! Session negotiation with the Repository Service.

use modelrepo_protocol::CreateUploadInput;
use tracing::info;

use crate::error::UploadError;
use crate::service::RepositoryService;
use crate::types::NegotiatedSession;

/// Asks the Repository Service to allocate an upload session.
///
/// Required fields are validated before any call is made. The session's
/// `partSizeBytes` is what the transfer uses; the hint in `input` is only
/// advisory.
pub async fn create_session(
    repo: &dyn RepositoryService,
    input: &CreateUploadInput,
) -> Result<NegotiatedSession, UploadError> {
    let input = input.normalized()?;
    let file_name = input.file_name.clone();

    let result = repo.create_upload(input).await?;
    if !result.success {
        let message = result.message.trim();
        return Err(UploadError::Remote(if message.is_empty() {
            "createModelRepoUpload failed".into()
        } else {
            message.to_string()
        }));
    }

    let session = match result.upload {
        Some(session) if !session.is_empty() => session,
        _ => {
            return Err(UploadError::Protocol(
                "upload response missing upload session details".into(),
            ));
        }
    };

    info!(
        file = %file_name,
        session_id = %session.session_id,
        parts = session.parts.len(),
        part_size = session.part_size_bytes,
        "upload session created"
    );

    Ok(NegotiatedSession {
        session,
        model: result.model,
        version: result.version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockRepo, created, session};
    use modelrepo_protocol::{MutationResult, UploadSession};

    fn input() -> CreateUploadInput {
        CreateUploadInput {
            name: "llama".into(),
            file_name: "model.bin".into(),
            file_size_bytes: "10".into(),
            part_size_bytes: "4".into(),
            ..CreateUploadInput::default()
        }
    }

    #[tokio::test]
    async fn returns_session_with_server_part_size() {
        let repo = MockRepo::default();
        repo.push_create(created(session("s1", 10, &[1])));

        let negotiated = create_session(&repo, &input()).await.unwrap();
        assert_eq!(negotiated.session.session_id, "s1");
        assert_eq!(negotiated.session.part_size_bytes, 10);

        let calls = repo.create_calls.lock().unwrap();
        assert_eq!(calls[0].part_size_bytes, "4");
    }

    #[tokio::test]
    async fn validation_happens_before_any_call() {
        let repo = MockRepo::default();
        let mut bad = input();
        bad.file_name = "  ".into();

        let err = create_session(&repo, &bad).await.unwrap_err();
        assert!(matches!(err, UploadError::Validation(ref m) if m == "fileName cannot be empty"));

        let mut bad = input();
        bad.file_size_bytes = "0".into();
        assert!(matches!(
            create_session(&repo, &bad).await,
            Err(UploadError::Validation(_))
        ));
        assert!(repo.create_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_upload_is_protocol_error() {
        let repo = MockRepo::default();
        repo.push_create(created(UploadSession::default()));
        repo.push_create(Ok(MutationResult {
            success: true,
            ..MutationResult::default()
        }));

        for _ in 0..2 {
            let err = create_session(&repo, &input()).await.unwrap_err();
            assert!(matches!(err, UploadError::Protocol(_)));
            assert_eq!(
                err.to_string(),
                "upload response missing upload session details"
            );
        }
    }

    #[tokio::test]
    async fn remote_failure_surfaces_message_or_fallback() {
        let repo = MockRepo::default();
        repo.push_create(Ok(MutationResult {
            success: false,
            message: "model not found".into(),
            ..MutationResult::default()
        }));
        repo.push_create(Ok(MutationResult::default()));

        let err = create_session(&repo, &input()).await.unwrap_err();
        assert_eq!(err.to_string(), "model not found");
        let err = create_session(&repo, &input()).await.unwrap_err();
        assert_eq!(err.to_string(), "createModelRepoUpload failed");
    }
}
