//! Rule-based validation mini-language.
//!
//! An allowed-value spec that is not a literal set is a rule expression:
//! a colon-delimited name with optional `=`-separated arguments, e.g.
//! `:alpha:` or `:range=1,5:`. Rules resolve through a two-tier table:
//! user-registered validators first, then the built-ins.

use std::collections::HashMap;

use prefbag_types::prelude::*;

/// Boxed validator fn: candidate value plus positional rule arguments.
pub type RuleFn = Box<dyn Fn(&SettingValue, &[&str]) -> bool + Send + Sync>;

/// Parsed rule expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleExpr {
	pub name: String,
	pub args: Vec<String>,
}

impl RuleExpr {
	/// Parse `:name:` or `:name=a,b:`. Anything else is not a rule:
	/// `test`, `:test` and `test:` all return None.
	pub fn parse(spec: &str) -> Option<Self> {
		let rest = spec.strip_prefix(':')?;
		let (body, _) = rest.split_once(':')?;
		if body.is_empty() {
			return None;
		}
		let (name, args) = match body.split_once('=') {
			Some((name, list)) => (name, list.split(',').map(str::to_string).collect()),
			None => (body, Vec::new()),
		};
		Some(Self { name: name.to_string(), args })
	}
}

impl std::fmt::Display for RuleExpr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.args.is_empty() {
			write!(f, ":{}:", self.name)
		} else {
			write!(f, ":{}={}:", self.name, self.args.join(","))
		}
	}
}

// Built-in rules //
//****************//

fn rule_any(_value: &SettingValue, _args: &[&str]) -> bool {
	true
}

fn rule_alpha(value: &SettingValue, _args: &[&str]) -> bool {
	value.as_str().is_some_and(|s| !s.is_empty() && s.chars().all(char::is_alphabetic))
}

fn rule_alphanum(value: &SettingValue, _args: &[&str]) -> bool {
	value.as_str().is_some_and(|s| !s.is_empty() && s.chars().all(char::is_alphanumeric))
}

fn rule_bool(value: &SettingValue, _args: &[&str]) -> bool {
	matches!(value, SettingValue::Bool(_))
}

fn rule_int(value: &SettingValue, _args: &[&str]) -> bool {
	matches!(value, SettingValue::Int(_))
}

fn rule_num(value: &SettingValue, _args: &[&str]) -> bool {
	value.as_number().is_some()
}

fn rule_range(value: &SettingValue, args: &[&str]) -> bool {
	let low = args.first().and_then(|a| a.parse::<f64>().ok());
	let high = args.get(1).and_then(|a| a.parse::<f64>().ok());
	let (Some(low), Some(high)) = (low, high) else {
		return false;
	};
	match value.as_number() {
		Some(n) => low <= n && n <= high,
		None => false,
	}
}

fn rule_string(value: &SettingValue, _args: &[&str]) -> bool {
	matches!(value, SettingValue::String(_))
}

fn builtin(name: &str) -> Option<fn(&SettingValue, &[&str]) -> bool> {
	match name {
		"any" => Some(rule_any),
		"alpha" => Some(rule_alpha),
		"alphanum" => Some(rule_alphanum),
		"bool" => Some(rule_bool),
		"int" => Some(rule_int),
		"num" => Some(rule_num),
		"range" => Some(rule_range),
		"string" => Some(rule_string),
		_ => None,
	}
}

// RuleBook //
//**********//

/// Rule dispatch table.
///
/// User-registered rules take precedence over built-ins of the same name.
/// A rule that resolves to neither fails with `Error::InvalidRule`.
#[derive(Default)]
pub struct RuleBook {
	user: HashMap<String, RuleFn>,
}

impl RuleBook {
	pub fn new() -> Self {
		Self { user: HashMap::new() }
	}

	/// Register a user rule validator under a name.
	pub fn register<F>(&mut self, name: impl Into<String>, f: F)
	where
		F: Fn(&SettingValue, &[&str]) -> bool + Send + Sync + 'static,
	{
		let name = name.into();
		debug!("registering rule validator: {}", name);
		self.user.insert(name, Box::new(f));
	}

	/// Evaluate a rule expression against a candidate value.
	pub fn validate(&self, expr: &RuleExpr, value: &SettingValue) -> PbResult<bool> {
		let args: Vec<&str> = expr.args.iter().map(String::as_str).collect();
		if let Some(f) = self.user.get(&expr.name) {
			return Ok(f(value, &args));
		}
		if let Some(f) = builtin(&expr.name) {
			return Ok(f(value, &args));
		}
		Err(Error::InvalidRule { name: expr.name.clone() })
	}
}

impl std::fmt::Debug for RuleBook {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RuleBook").field("user", &self.user.keys()).finish()
	}
}


// vim: ts=4
