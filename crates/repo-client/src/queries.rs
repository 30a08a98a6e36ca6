//! GraphQL documents sent to the Repository Service.

pub const ADD_MODEL: &str = r#"
mutation addModelToRepo($input: AddModelToRepoInput!) {
    addModelToRepo(input: $input) {
        success
        message
        model {
            id
            name
            provider
            status
            createdAt
            updatedAt
            users {
                userId
                credentialType
                credentialReference
                status
                updatedAt
            }
            versions {
                hash
                status
                metadata
                createdAt
                updatedAt
            }
        }
    }
}
"#;

pub const CREATE_UPLOAD: &str = r#"
mutation createModelRepoUpload($input: CreateModelRepoUploadInput!) {
    createModelRepoUpload(input: $input) {
        success
        message
        upload {
            sessionId
            status
            uploadId
            bucket
            key
            keyPrefix
            partSizeBytes
            partCount
            expiresInSeconds
            parts {
                partNumber
                url
                expiresAt
            }
            completeUrl
            abortUrl
        }
        model {
            id
            name
            provider
            status
            updatedAt
        }
        version {
            hash
            status
            metadata
            createdAt
            updatedAt
        }
    }
}
"#;

pub const COMPLETE_UPLOAD: &str = r#"
mutation completeModelRepoUpload($input: CompleteModelRepoUploadInput!) {
    completeModelRepoUpload(input: $input) {
        success
        message
        sessionId
        status
    }
}
"#;

pub const UPDATE_VERSION_STATUS: &str = r#"
mutation updateModelVersionStatus($hash: ID!, $status: ModelVersionStatus!) {
    updateModelVersionStatus(hash: $hash, status: $status) {
        success
        message
        modelVersion {
            hash
            status
            metadata
            createdAt
            updatedAt
        }
    }
}
"#;
