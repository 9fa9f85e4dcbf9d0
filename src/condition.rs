//! Query conditions and their translation to SQL.
//!
//! Three forms are supported:
//!
//! - **positional**: a raw fragment with `?` placeholders and ordered arguments
//! - **named**: a raw fragment with `:name` placeholders and a name → value
//!   lookup; each occurrence becomes `?` and a name used twice is bound twice
//!   from the same entry
//! - **columns**: column → value or column → list pairs, rendered as
//!   `"col" = ?` / `"col" IN (?, ...)` and joined with ` AND ` in insertion order
//!
//! # Examples
//!
//! ```
//! use rowkeeper::{Condition, Operand};
//!
//! let cond = Condition::named("title = :title OR body = :title", [("title", "Hello")]);
//! let (sql, values) = cond.build().unwrap();
//! assert_eq!(sql, "title = ? OR body = ?");
//! assert_eq!(values.len(), 2);
//!
//! let cond = Condition::columns([("id", Operand::list([1i64, 2]))]);
//! assert_eq!(cond.build().unwrap().0, r#""id" IN (?, ?)"#);
//! ```

use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::statement::{quote, Fragment};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_query::Value;

/// Quoted literals, identifiers and `::` casts are matched first and left alone;
/// only group 1 is a placeholder.
static NAMED_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"'[^']*'|"[^"]*"|`[^`]*`|::|:([A-Za-z_][A-Za-z0-9_]*)"#)
        .expect("placeholder pattern is a valid regex")
});

/// Right-hand side of a column condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// `"col" = ?`
    Value(Value),
    /// `"col" IN (?, ...)`; an empty list matches nothing
    List(Vec<Value>),
}

impl Operand {
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

macro_rules! operand_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Operand::Value(value.into())
                }
            }
        )*
    };
}

operand_from!(Value, &str, String, bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Positional {
        fragment: String,
        args: Vec<Value>,
    },
    Named {
        fragment: String,
        binds: Vec<(String, Value)>,
    },
    Columns(Vec<(String, Operand)>),
}

impl Condition {
    pub fn positional<I, V>(fragment: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Condition::Positional {
            fragment: fragment.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Accepts an array of pairs or any map; both resolve names the same way.
    pub fn named<I, K, V>(fragment: impl Into<String>, binds: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Condition::Named {
            fragment: fragment.into(),
            binds: binds
                .into_iter()
                .map(|(k, v)| {
                    let name: String = k.into();
                    (name.trim_start_matches(':').to_string(), v.into())
                })
                .collect(),
        }
    }

    pub fn columns<I, K, O>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, O)>,
        K: Into<String>,
        O: Into<Operand>,
    {
        Condition::Columns(
            pairs
                .into_iter()
                .map(|(k, o)| (k.into(), o.into()))
                .collect(),
        )
    }

    /// Render to SQL text plus binds in placeholder order.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnboundParameter` when a named placeholder has no value.
    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        let fragment = self.to_fragment()?;
        Ok((fragment.sql, fragment.values))
    }

    pub(crate) fn to_fragment(&self) -> Result<Fragment> {
        match self {
            Condition::Positional { fragment, args } => {
                let placeholders = count_placeholders(fragment);
                if placeholders != args.len() {
                    return Err(Error::BindCountMismatch {
                        placeholders,
                        values: args.len(),
                    });
                }
                Ok(Fragment::new(fragment.clone(), args.clone()))
            }
            Condition::Named { fragment, binds } => expand_named(fragment, binds),
            Condition::Columns(pairs) => Ok(render_columns(pairs)),
        }
    }

    /// Column conditions may only name declared columns.
    pub(crate) fn check_columns(&self, metadata: &Metadata) -> Result<()> {
        if let Condition::Columns(pairs) = self {
            for (column, _) in pairs {
                metadata.require_column(column)?;
            }
        }
        Ok(())
    }
}

/// `?` marks outside quoted literals and identifiers.
fn count_placeholders(fragment: &str) -> usize {
    let mut quote: Option<char> = None;
    let mut count = 0;
    for ch in fragment.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(ch),
            (None, '?') => count += 1,
            (None, _) => {}
        }
    }
    count
}

fn expand_named(fragment: &str, binds: &[(String, Value)]) -> Result<Fragment> {
    let mut sql = String::with_capacity(fragment.len());
    let mut values = Vec::new();
    let mut last = 0;

    for caps in NAMED_PLACEHOLDER.captures_iter(fragment) {
        let Some(name) = caps.get(1) else {
            continue;
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let value = binds
            .iter()
            .find(|(k, _)| k == name.as_str())
            .map(|(_, v)| v.clone())
            .ok_or_else(|| Error::UnboundParameter {
                name: name.as_str().to_string(),
            })?;
        sql.push_str(&fragment[last..whole.start()]);
        sql.push('?');
        values.push(value);
        last = whole.end();
    }
    sql.push_str(&fragment[last..]);

    Ok(Fragment::new(sql, values))
}

fn render_columns(pairs: &[(String, Operand)]) -> Fragment {
    let mut clauses = Vec::with_capacity(pairs.len());
    let mut values = Vec::new();

    for (column, operand) in pairs {
        match operand {
            Operand::Value(v) => {
                clauses.push(format!("{} = ?", quote(column)));
                values.push(v.clone());
            }
            Operand::List(list) if list.is_empty() => clauses.push("1 = 0".to_string()),
            Operand::List(list) => {
                let marks = vec!["?"; list.len()].join(", ");
                clauses.push(format!("{} IN ({})", quote(column), marks));
                values.extend(list.iter().cloned());
            }
        }
    }

    Fragment::new(clauses.join(" AND "), values)
}
