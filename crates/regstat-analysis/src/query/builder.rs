//! Parameterized SQL assembly.
//!
//! Filter values only ever travel as bound parameters. Column and table
//! identifiers come from this crate and are the only interpolated text.
//! Placeholders are anonymous `?`, so parameters bind in textual order:
//! select-list parameters first, then WHERE parameters.

use rusqlite::types::Value;

/// `?, ?, ?` for `n` values.
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[derive(Debug, Default)]
pub struct SqlBuilder {
    select: Option<String>,
    select_params: Vec<Value>,
    joins: Vec<String>,
    predicates: Vec<String>,
    where_params: Vec<Value>,
}

impl SqlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The aggregate value expression, with its parameters.
    pub fn value(&mut self, expr: impl Into<String>, params: Vec<Value>) -> &mut Self {
        self.select = Some(expr.into());
        self.select_params = params;
        self
    }

    pub fn join(&mut self, clause: impl Into<String>) -> &mut Self {
        self.joins.push(clause.into());
        self
    }

    /// One conjunctive clause.
    pub fn predicate(&mut self, sql: impl Into<String>, params: Vec<Value>) -> &mut Self {
        self.predicates.push(sql.into());
        self.where_params.extend(params);
        self
    }

    /// `column IN (...)`; an empty set adds nothing.
    pub fn in_ids<'a>(
        &mut self,
        column: &str,
        ids: impl IntoIterator<Item = &'a i64>,
    ) -> &mut Self {
        let params: Vec<Value> = ids.into_iter().map(|id| Value::Integer(*id)).collect();
        if params.is_empty() {
            return self;
        }
        let sql = format!("{column} IN ({})", placeholders(params.len()));
        self.predicate(sql, params)
    }

    /// `column IN (...)` over text values; an empty set adds nothing.
    pub fn in_text<'a>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = &'a String>,
    ) -> &mut Self {
        let params: Vec<Value> = values.into_iter().map(|v| Value::Text(v.clone())).collect();
        if params.is_empty() {
            return self;
        }
        let sql = format!("{column} IN ({})", placeholders(params.len()));
        self.predicate(sql, params)
    }

    /// `(a OR b OR ...)`; no alternatives adds nothing.
    pub fn any_of(&mut self, alternatives: Vec<(String, Vec<Value>)>) -> &mut Self {
        if alternatives.is_empty() {
            return self;
        }
        let mut sql = Vec::with_capacity(alternatives.len());
        let mut params = Vec::new();
        for (clause, p) in alternatives {
            sql.push(format!("({clause})"));
            params.extend(p);
        }
        self.predicate(format!("({})", sql.join(" OR ")), params)
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    /// `SELECT year, value ... GROUP BY year ORDER BY year` over `table`
    /// aliased `f`.
    pub fn build_yearly(self, table: &str) -> (String, Vec<Value>) {
        let value = self.select.unwrap_or_else(|| "COUNT(*)".to_string());
        let mut sql = format!("SELECT f.year, {value} FROM {table} f");
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }
        sql.push_str(" GROUP BY f.year ORDER BY f.year");

        let mut params = self.select_params;
        params.extend(self.where_params);
        (sql, params)
    }
}
