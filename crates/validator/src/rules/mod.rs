//! Built-in rule catalog
//!
//! One module per category. Every rule here is registered by name in
//! [`Registry::builtin`](crate::registry::Registry::builtin); the bare
//! predicates (`is_valid_email`, `is_mysql_date`, ...) are exported for
//! hosts that want the checks without the engine.

pub mod callback;
pub mod collection;
pub mod content;
pub mod datetime;
pub mod length;
pub mod network;
pub mod numeric;
pub mod password;
pub mod phone;
pub mod required;

pub use callback::CallbackRule;
pub use collection::{AllInArrayRule, AllMatchRule, AllUniqueRule, InArrayRule, OneRequiredRule};
pub use content::{EmailRule, ProseTextRule, RegexRule, is_prose_text, is_valid_email};
pub use datetime::{
    DateMySqlRule, DateRangeRule, DateTimeMySqlRule, TimeMySqlRule, is_mysql_date,
    is_mysql_datetime, is_mysql_time,
};
pub use length::LengthRule;
pub use network::{Ipv4AddrOrCidrRule, Ipv4AddrRule, Ipv4CidrRule, is_ipv4_addr, is_ipv4_cidr};
pub use numeric::{
    BinaryRule, NumericRule, PositiveIntRule, RangeRule, is_binary_value, is_numeric_text,
    is_numeric_value, is_positive_int_value,
};
pub use password::PasswordRule;
pub use phone::PhoneRule;
pub use required::RequiredRule;
