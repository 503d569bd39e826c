//! IPv4 address and CIDR rules

use std::any::Any;

use serde_json::Value;

use crate::foundation::prelude::*;

// ============================================================================
// PREDICATES
// ============================================================================

/// Four dot-separated all-digit octets, each at most 255.
pub fn is_ipv4_addr(text: &str) -> bool {
    let mut octets = 0;
    for part in text.split('.') {
        octets += 1;
        if octets > 4 {
            return false;
        }
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match part.parse::<u16>() {
            Ok(value) if value <= 255 => {}
            _ => return false,
        }
    }
    octets == 4
}

/// An IPv4 address followed by `/mask` with mask at most 32.
pub fn is_ipv4_cidr(text: &str) -> bool {
    let Some((addr, mask)) = text.split_once('/') else {
        return false;
    };
    is_ipv4_addr(addr)
        && !mask.is_empty()
        && mask.len() <= 2
        && mask.bytes().all(|b| b.is_ascii_digit())
        && mask.parse::<u8>().is_ok_and(|m| m <= 32)
}

pub(crate) fn ipv4_message() -> Message {
    Message::new("ipv4", "Must be a valid IPv4 address")
}

fn cidr_message() -> Message {
    Message::new("cidr", "Must be a valid IPv4 CIDR block")
}

// ============================================================================
// RULES
// ============================================================================

/// Validates bare IPv4 addresses.
#[derive(Debug, Clone, Default)]
pub struct Ipv4AddrRule {
    fields: FieldList,
}

impl Rule for Ipv4AddrRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        match value.as_str() {
            Some(text) if is_ipv4_addr(text) => Ok(()),
            _ => Err(Violation::Broadcast(ipv4_message())),
        }
    }

    fn boxed_clone(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Validates IPv4 CIDR blocks.
#[derive(Debug, Clone, Default)]
pub struct Ipv4CidrRule {
    fields: FieldList,
}

impl Rule for Ipv4CidrRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        match value.as_str() {
            Some(text) if is_ipv4_cidr(text) => Ok(()),
            _ => Err(Violation::Broadcast(cidr_message())),
        }
    }

    fn boxed_clone(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Accepts either form, dispatching on the presence of `/`.
#[derive(Debug, Clone, Default)]
pub struct Ipv4AddrOrCidrRule {
    fields: FieldList,
}

impl Rule for Ipv4AddrOrCidrRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        let Some(text) = value.as_str() else {
            return Err(Violation::Broadcast(ipv4_message()));
        };
        if text.contains('/') {
            if is_ipv4_cidr(text) {
                Ok(())
            } else {
                Err(Violation::Broadcast(cidr_message()))
            }
        } else if is_ipv4_addr(text) {
            Ok(())
        } else {
            Err(Violation::Broadcast(ipv4_message()))
        }
    }

    fn boxed_clone(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_addresses() {
        assert!(is_ipv4_addr("0.0.0.0"));
        assert!(is_ipv4_addr("192.168.1.1"));
        assert!(is_ipv4_addr("255.255.255.255"));
    }

    #[test]
    fn invalid_addresses() {
        assert!(!is_ipv4_addr("256.1.1.1"));
        assert!(!is_ipv4_addr("1.2.3"));
        assert!(!is_ipv4_addr("1.2.3.4.5"));
        assert!(!is_ipv4_addr("1.2.3."));
        assert!(!is_ipv4_addr("a.b.c.d"));
        assert!(!is_ipv4_addr("1234.1.1.1"));
    }

    #[test]
    fn valid_cidrs() {
        assert!(is_ipv4_cidr("10.0.0.0/8"));
        assert!(is_ipv4_cidr("192.168.0.0/32"));
        assert!(is_ipv4_cidr("0.0.0.0/0"));
    }

    #[test]
    fn invalid_cidrs() {
        assert!(!is_ipv4_cidr("10.0.0.0"));
        assert!(!is_ipv4_cidr("10.0.0.0/33"));
        assert!(!is_ipv4_cidr("10.0.0.0/"));
        assert!(!is_ipv4_cidr("256.0.0.0/8"));
        assert!(!is_ipv4_cidr("10.0.0.0/8/8"));
    }

    #[test]
    fn dispatch_rule_accepts_both_forms() {
        let rule = Ipv4AddrOrCidrRule::default();
        assert!(rule.validate_one("ip", &json!("10.1.2.3")).is_ok());
        assert!(rule.validate_one("ip", &json!("10.1.2.0/24")).is_ok());
    }

    #[test]
    fn dispatch_rule_reports_the_right_kind() {
        let rule = Ipv4AddrOrCidrRule::default();
        let Err(Violation::Broadcast(message)) = rule.validate_one("ip", &json!("10.1.2.0/99"))
        else {
            panic!("expected failure");
        };
        assert_eq!(message.code, "cidr");

        let Err(Violation::Broadcast(message)) = rule.validate_one("ip", &json!("999.1.2.3"))
        else {
            panic!("expected failure");
        };
        assert_eq!(message.code, "ipv4");
    }

    #[test]
    fn numbers_are_not_addresses() {
        let rule = Ipv4AddrRule::default();
        assert!(rule.validate_one("ip", &json!(19216811)).is_err());
    }

    #[test]
    fn derived_and_overridden_names() {
        assert_eq!(Ipv4AddrRule::default().name(), "ipv4Addr");
        assert_eq!(Ipv4CidrRule::default().name(), "ipv4Cidr");
        assert_eq!(Ipv4AddrOrCidrRule::default().name(), "ipv4AddrOrCidr");
    }
}
