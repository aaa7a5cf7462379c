//! The `GenerationRequest` value and its builder.
//!
//! A request is constructed once per invocation, consumed by the planner and
//! never mutated. All optional parameters are opaque strings: rights, tokens
//! and entity type tags have no registry to validate against.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    naming,
    value_objects::{DomainName, GenerationMode},
};

// ── SagaStep ──────────────────────────────────────────────────────────────────

/// One step of a scaffolded saga.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SagaStep {
    name: String,
    has_compensation: bool,
}

impl SagaStep {
    pub fn new(name: impl Into<String>, has_compensation: bool) -> Result<Self, DomainError> {
        let name = name.into();
        if !naming::is_identifier(&name) {
            return Err(DomainError::InvalidSagaStep {
                step: name,
                reason: "must start with a letter and contain only letters and digits".into(),
            });
        }
        Ok(Self {
            name,
            has_compensation,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn has_compensation(&self) -> bool {
        self.has_compensation
    }
}

impl fmt::Display for SagaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_compensation {
            write!(f, "{}:compensate", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Parses `NAME` or `NAME:compensate`.
impl FromStr for SagaStep {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once(':') {
            None => Self::new(s.trim(), false),
            Some((name, "compensate")) => Self::new(name, true),
            Some((_, flag)) => Err(DomainError::InvalidSagaStep {
                step: s.into(),
                reason: format!("unknown step flag '{flag}' (expected 'compensate')"),
            }),
        }
    }
}

// ── GenerationRequest ─────────────────────────────────────────────────────────

/// Immutable input to one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    domain: DomainName,
    mode: GenerationMode,
    security_right: Option<String>,
    entity_type_tag: Option<String>,
    repository_token: Option<String>,
    saga_steps: Option<Vec<SagaStep>>,
    service_dependencies: BTreeSet<String>,
}

impl GenerationRequest {
    pub fn builder(domain: DomainName, mode: GenerationMode) -> GenerationRequestBuilder {
        GenerationRequestBuilder {
            domain,
            mode,
            security_right: None,
            entity_type_tag: None,
            repository_token: None,
            saga_steps: None,
            service_dependencies: BTreeSet::new(),
        }
    }

    pub fn domain(&self) -> &DomainName {
        &self.domain
    }

    pub const fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn security_right(&self) -> Option<&str> {
        self.security_right.as_deref()
    }

    pub fn entity_type_tag(&self) -> Option<&str> {
        self.entity_type_tag.as_deref()
    }

    pub fn repository_token(&self) -> Option<&str> {
        self.repository_token.as_deref()
    }

    /// `None` when the caller never supplied steps; `Some(&[])` when the
    /// caller explicitly supplied an empty list.
    pub fn saga_steps(&self) -> Option<&[SagaStep]> {
        self.saga_steps.as_deref()
    }

    pub fn service_dependencies(&self) -> &BTreeSet<String> {
        &self.service_dependencies
    }

    /// Copy of this request with a concrete mode, used once interactive
    /// prompts have been answered.
    pub fn with_mode(&self, mode: GenerationMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }
}

/// Builder for [`GenerationRequest`].
///
/// Blank strings are treated as absent so prompt answers and empty config
/// values do not leak into templates.
#[derive(Debug, Clone)]
pub struct GenerationRequestBuilder {
    domain: DomainName,
    mode: GenerationMode,
    security_right: Option<String>,
    entity_type_tag: Option<String>,
    repository_token: Option<String>,
    saga_steps: Option<Vec<SagaStep>>,
    service_dependencies: BTreeSet<String>,
}

impl GenerationRequestBuilder {
    pub fn security_right(mut self, right: impl Into<String>) -> Self {
        self.security_right = non_blank(right.into());
        self
    }

    pub fn entity_type_tag(mut self, tag: impl Into<String>) -> Self {
        self.entity_type_tag = non_blank(tag.into());
        self
    }

    pub fn repository_token(mut self, token: impl Into<String>) -> Self {
        self.repository_token = non_blank(token.into());
        self
    }

    pub fn saga_steps(mut self, steps: Vec<SagaStep>) -> Self {
        self.saga_steps = Some(steps);
        self
    }

    pub fn service(mut self, service: impl Into<String>) -> Self {
        if let Some(s) = non_blank(service.into()) {
            self.service_dependencies.insert(s);
        }
        self
    }

    pub fn services<I, S>(self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        services.into_iter().fold(self, |b, s| b.service(s))
    }

    pub fn build(self) -> Result<GenerationRequest, DomainError> {
        if let Some(steps) = &self.saga_steps {
            let mut seen = BTreeSet::new();
            for step in steps {
                if !seen.insert(step.name()) {
                    return Err(DomainError::InvalidSagaStep {
                        step: step.name().into(),
                        reason: "duplicate step name".into(),
                    });
                }
            }
        }

        for service in &self.service_dependencies {
            if !naming::is_identifier(service) {
                return Err(DomainError::InvalidIdentifier {
                    field: "service dependency",
                    value: service.clone(),
                });
            }
        }

        Ok(GenerationRequest {
            domain: self.domain,
            mode: self.mode,
            security_right: self.security_right,
            entity_type_tag: self.entity_type_tag,
            repository_token: self.repository_token,
            saga_steps: self.saga_steps,
            service_dependencies: self.service_dependencies,
        })
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
