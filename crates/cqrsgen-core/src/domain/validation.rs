use crate::domain::{
    entities::{GenerationRequest, SagaStep},
    error::DomainError,
    value_objects::{ArtifactKind, GenerationMode},
};

/// Request checks that need no knowledge of the tree.
///
/// Everything here runs before the scanner result is consulted, so a
/// rejected request never reaches the filesystem.
pub struct DomainValidator;

impl DomainValidator {
    /// Check mode and saga parameters, returning the saga steps to render.
    ///
    /// `Crud` without steps gets one compensable `process{Pascal}` step.
    /// An explicitly empty list is an error for both `Crud` and `Saga`.
    pub fn validate_request(request: &GenerationRequest) -> Result<Vec<SagaStep>, DomainError> {
        match request.mode() {
            GenerationMode::Interactive => Err(DomainError::MissingRequiredParam {
                kind: "request".into(),
                param: "mode",
            }),
            GenerationMode::Saga => match request.saga_steps() {
                Some(steps) if !steps.is_empty() => Ok(steps.to_vec()),
                _ => Err(missing_steps()),
            },
            GenerationMode::Crud => match request.saga_steps() {
                None => Ok(vec![SagaStep::new(
                    format!("process{}", request.domain().pascal()),
                    true,
                )?]),
                Some([]) => Err(missing_steps()),
                Some(steps) => Ok(steps.to_vec()),
            },
            _ => Ok(Vec::new()),
        }
    }
}

fn missing_steps() -> DomainError {
    DomainError::MissingRequiredParam {
        kind: ArtifactKind::Saga.to_string(),
        param: "sagaSteps",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{CommandOp, DomainName};

    fn request(mode: GenerationMode, steps: Option<Vec<SagaStep>>) -> GenerationRequest {
        let builder = GenerationRequest::builder(DomainName::parse("invoice").unwrap(), mode);
        match steps {
            Some(s) => builder.saga_steps(s).build().unwrap(),
            None => builder.build().unwrap(),
        }
    }

    #[test]
    fn crud_defaults_to_one_compensable_step() {
        let steps = DomainValidator::validate_request(&request(GenerationMode::Crud, None)).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name(), "processInvoice");
        assert!(steps[0].has_compensation());
    }

    #[test]
    fn explicit_empty_steps_are_rejected() {
        for mode in [GenerationMode::Crud, GenerationMode::Saga] {
            let err = DomainValidator::validate_request(&request(mode, Some(vec![]))).unwrap_err();
            assert!(matches!(
                err,
                DomainError::MissingRequiredParam {
                    param: "sagaSteps",
                    ..
                }
            ));
        }
    }

    #[test]
    fn saga_without_steps_is_rejected() {
        assert!(DomainValidator::validate_request(&request(GenerationMode::Saga, None)).is_err());
    }

    #[test]
    fn interactive_must_be_resolved() {
        let err =
            DomainValidator::validate_request(&request(GenerationMode::Interactive, None)).unwrap_err();
        assert!(matches!(
            err,
            DomainError::MissingRequiredParam { param: "mode", .. }
        ));
    }

    #[test]
    fn single_modes_need_no_steps() {
        let steps = DomainValidator::validate_request(&request(
            GenerationMode::SingleCommand(CommandOp::Update),
            None,
        ))
        .unwrap();
        assert!(steps.is_empty());
    }
}
