use std::collections::BTreeMap;

use crate::domain::value_objects::DomainName;

/// Variables available to a template, keyed by `SCREAMING_SNAKE_CASE` name.
///
/// ## Built-in Variables
///
/// | Variable | `purchaseOrder` |
/// |----------|-----------------|
/// | `DOMAIN` | `purchaseOrder` |
/// | `DOMAIN_FILE` | `purchase-order` |
/// | `DOMAIN_PASCAL` | `PurchaseOrder` |
/// | `DOMAIN_CAMEL` | `purchaseOrder` |
/// | `DOMAIN_CONSTANT` | `PURCHASE_ORDER` |
/// | `DOMAIN_PLURAL` | `purchase-orders` |
/// | `DOMAIN_PLURAL_PASCAL` | `PurchaseOrders` |
///
/// Kind-specific variables are added with [`RenderContext::with_variable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new(domain: &DomainName) -> Self {
        let variables = [
            ("DOMAIN", domain.raw()),
            ("DOMAIN_FILE", domain.as_str()),
            ("DOMAIN_PASCAL", domain.pascal()),
            ("DOMAIN_CAMEL", domain.camel()),
            ("DOMAIN_CONSTANT", domain.constant()),
            ("DOMAIN_PLURAL", domain.plural()),
            ("DOMAIN_PLURAL_PASCAL", domain.plural_pascal()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self { variables }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace `{{VARIABLE}}` placeholders in one left-to-right pass.
    ///
    /// Unknown placeholders are left as written. Substituted values are not
    /// rescanned, so a value containing `{{X}}` is emitted literally.
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = &after[..end];
                    match self.variables.get(key) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push_str("{{");
                            out.push_str(key);
                            out.push_str("}}");
                        }
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RenderContext {
        RenderContext::new(&DomainName::parse("purchaseOrder").unwrap())
    }

    #[test]
    fn derives_domain_forms() {
        let ctx = ctx();
        assert_eq!(ctx.get("DOMAIN_FILE"), Some("purchase-order"));
        assert_eq!(ctx.get("DOMAIN_CONSTANT"), Some("PURCHASE_ORDER"));
        assert_eq!(ctx.get("DOMAIN_PLURAL_PASCAL"), Some("PurchaseOrders"));
    }

    #[test]
    fn renders_known_and_keeps_unknown() {
        let out = ctx().render("class {{DOMAIN_PASCAL}} {{NOPE}} {{DOMAIN_PASCAL}}");
        assert_eq!(out, "class PurchaseOrder {{NOPE}} PurchaseOrder");
    }

    #[test]
    fn values_are_not_rescanned() {
        let out = ctx()
            .with_variable("A", "{{DOMAIN_FILE}}")
            .render("{{A}}");
        assert_eq!(out, "{{DOMAIN_FILE}}");
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        assert_eq!(ctx().render("x {{DOMAIN"), "x {{DOMAIN");
    }
}
