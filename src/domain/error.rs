use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StackError {
    #[error("invalid stack name `{name}`: {reason}")]
    InvalidStackName { name: String, reason: &'static str },
    #[error("invalid bucket name `{name}`: {reason}")]
    InvalidBucketName { name: String, reason: &'static str },
    #[error("bucket `{bucket}` cannot auto-delete objects unless its removal policy is destroy")]
    AutoDeleteRequiresDestroy { bucket: String },
    #[error("construct path must not be empty")]
    EmptyPath,
    #[error("there is already a construct at `{path}`")]
    DuplicateConstruct { path: String },
    #[error("logical id `{logical_id}` is already allocated")]
    DuplicateLogicalId { logical_id: String },
    #[error("resource `{logical_id}` is not declared in stack `{stack}`")]
    ForeignReference { stack: String, logical_id: String },
    #[error("output `{name}` is already declared")]
    DuplicateOutput { name: String },
    #[error("cannot apply override at `{path}`: {reason}")]
    InvalidOverride { path: String, reason: String },
    #[error("{construct} requires at least one {what}")]
    MissingRequired {
        construct: &'static str,
        what: &'static str,
    },
}
