//! Table definition structures and entity naming

/// Table definition read from the live schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub table_name: String,
    pub columns: Vec<ColumnDefinition>,
}

/// Column definition within a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub sql_type: String,
    pub not_null: bool,
    /// 1-based position within the primary key, 0 when not part of it
    pub primary_key_position: u32,
}

impl TableDefinition {
    /// PascalCase, singular entity name (`blog_posts` → `BlogPost`).
    pub fn entity_name(&self) -> String {
        classify(&self.table_name)
    }

    /// snake_case file/module stem for the entity (`blog_posts` → `blog_post`).
    pub fn module_name(&self) -> String {
        snake_case(&self.entity_name())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// The single primary-key column, or `None` for tables without one or with
    /// a composite key.
    pub fn primary_key(&self) -> Option<&str> {
        let mut keys = self.columns.iter().filter(|c| c.primary_key_position > 0);
        match (keys.next(), keys.next()) {
            (Some(key), None) => Some(key.name.as_str()),
            _ => None,
        }
    }

    /// Create an example definition for testing
    pub fn example() -> Self {
        Self {
            table_name: "posts".to_string(),
            columns: vec![
                ColumnDefinition {
                    name: "id".to_string(),
                    sql_type: "INTEGER".to_string(),
                    not_null: false,
                    primary_key_position: 1,
                },
                ColumnDefinition {
                    name: "title".to_string(),
                    sql_type: "TEXT".to_string(),
                    not_null: false,
                    primary_key_position: 0,
                },
                ColumnDefinition {
                    name: "body".to_string(),
                    sql_type: "TEXT".to_string(),
                    not_null: false,
                    primary_key_position: 0,
                },
            ],
        }
    }
}

/// Table name → entity name: PascalCase with the last word singularized.
pub fn classify(table_name: &str) -> String {
    let words: Vec<&str> = table_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let last = words.len().saturating_sub(1);

    words
        .iter()
        .enumerate()
        .map(|(idx, word)| {
            let lower = word.to_ascii_lowercase();
            let word = if idx == last { singularize(&lower) } else { lower };
            capitalize(&word)
        })
        .collect()
}

/// Drop a trailing English plural.
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "xes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with("ss") || word.ends_with("us") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

/// `BlogPost` → `blog_post`
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (idx, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
