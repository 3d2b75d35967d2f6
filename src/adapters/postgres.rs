use sqlparser::ast;

use super::{Error, Result, StatementAdapter};
use crate::{
    data_type::Value,
    namer,
    relation::Relation,
    sampling::{SampleKind, SampleMethod, Units},
};

/// PostgreSQL connects to a single database, relations are named `schema.name`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PostgresAdapter;

impl PostgresAdapter {
    pub fn new() -> Self {
        PostgresAdapter
    }

    /// `TABLESAMPLE` only applies to tables, CTEs are sampled with `RANDOM()`
    fn random_sample_clause(&self, sample_method: &SampleMethod) -> String {
        match sample_method.units() {
            Units::Rows(rows) => format!("ORDER BY RANDOM() LIMIT {rows}"),
            Units::Percent(percent) => format!("WHERE RANDOM() < {}", percent / 100.0),
        }
    }
}

impl StatementAdapter for PostgresAdapter {
    fn name(&self) -> &str {
        "postgresql"
    }

    fn quoted_dot_notation(&self, relation: &Relation) -> String {
        ast::ObjectName(vec![
            ast::Ident::with_quote(self.quote_style(), relation.name().schema()),
            ast::Ident::with_quote(self.quote_style(), relation.name().name()),
        ])
        .to_string()
    }

    fn sample_clause(&self, sample_method: &SampleMethod) -> Result<String> {
        match (sample_method.kind(), sample_method.units()) {
            (SampleKind::Bernoulli, Units::Percent(percent)) => {
                Ok(format!("TABLESAMPLE BERNOULLI ({percent})"))
            }
            (SampleKind::System, Units::Percent(percent)) => {
                Ok(format!("TABLESAMPLE SYSTEM ({percent})"))
            }
            (SampleKind::System, Units::Rows(rows)) => {
                Ok(format!("TABLESAMPLE SYSTEM_ROWS ({rows})"))
            }
            (SampleKind::Bernoulli, Units::Rows(_)) => {
                Err(Error::unsupported_sample_method(sample_method, self.name()))
            }
        }
    }

    /// Row counts of Bernoulli samples have no `TABLESAMPLE` method, rows are drawn with `RANDOM()`
    fn sample_statement_from_relation(
        &self,
        relation: &Relation,
        sample_method: Option<&SampleMethod>,
    ) -> Result<String> {
        let statement = format!("SELECT * FROM {}", self.quoted_dot_notation(relation));
        Ok(match sample_method {
            Some(sample_method)
                if matches!(
                    (sample_method.kind(), sample_method.units()),
                    (SampleKind::Bernoulli, Units::Rows(_))
                ) =>
            {
                format!("{statement} {}", self.random_sample_clause(sample_method))
            }
            Some(sample_method) => format!("{statement} {}", self.sample_clause(sample_method)?),
            None => statement,
        })
    }

    fn view_creation_statement(&self, relation: &Relation) -> Result<String> {
        Ok(format!(
            "SELECT definition FROM pg_catalog.pg_views WHERE schemaname = {} AND viewname = {}",
            self.literal(&Value::from(relation.name().schema())),
            self.literal(&Value::from(relation.name().name())),
        ))
    }

    fn directionally_wrap_statement(
        &self,
        statement: &str,
        relation: &Relation,
        sample_method: Option<&SampleMethod>,
    ) -> Result<String> {
        let Some(sample_method) = sample_method else {
            return Ok(statement.to_string());
        };
        let final_sample = self.scoped_cte(relation, namer::FINAL_SAMPLE);
        let directional_sample = self.scoped_cte(relation, namer::DIRECTIONAL_SAMPLE);
        Ok(format!(
            "WITH {final_sample} AS (\n{statement}\n),\n{directional_sample} AS (\nSELECT * FROM {final_sample} {}\n)\nSELECT * FROM {directional_sample}",
            self.random_sample_clause(sample_method)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builder::{Ready, With},
        data_type::DataType,
    };

    fn relation(name: &str) -> Relation {
        Relation::builder()
            .database("postgres")
            .schema("public")
            .name(name)
            .with(("id", DataType::Integer))
            .build()
    }

    #[test]
    fn test_quoted_dot_notation() {
        let adapter = PostgresAdapter;
        assert_eq!(
            adapter.quoted_dot_notation(&relation("users")),
            r#""public"."users""#
        );
        assert_eq!(
            adapter
                .union_constraint_statement(&relation("orders"), &relation("users"), "user_id", "id", 10)
                .unwrap(),
            r#"(SELECT * FROM "public"."orders" WHERE user_id NOT IN (SELECT id FROM "public"."users") LIMIT 10)"#
        );
    }

    #[test]
    fn test_sample_clause() {
        let adapter = PostgresAdapter;
        let users = relation("users");
        let statement = adapter
            .sample_statement_from_relation(
                &users,
                Some(&SampleMethod::bernoulli_percent(10.0).unwrap()),
            )
            .unwrap();
        println!("{statement}");
        assert_eq!(
            statement,
            r#"SELECT * FROM "public"."users" TABLESAMPLE BERNOULLI (10)"#
        );
        assert_eq!(
            adapter
                .sample_clause(&SampleMethod::system_rows(1000).unwrap())
                .unwrap(),
            "TABLESAMPLE SYSTEM_ROWS (1000)"
        );
        assert_eq!(
            adapter
                .sample_clause(&SampleMethod::system_percent(5.0).unwrap())
                .unwrap(),
            "TABLESAMPLE SYSTEM (5)"
        );
        assert!(matches!(
            adapter.sample_clause(&SampleMethod::bernoulli_rows(1000).unwrap()),
            Err(Error::UnsupportedSampleMethod(_))
        ));
        // Estimated sample sizes are Bernoulli row counts
        assert_eq!(
            adapter
                .sample_statement_from_relation(
                    &users,
                    Some(&SampleMethod::bernoulli_rows(4147).unwrap())
                )
                .unwrap(),
            r#"SELECT * FROM "public"."users" ORDER BY RANDOM() LIMIT 4147"#
        );
    }

    #[test]
    fn test_view_creation_statement() {
        let statement = PostgresAdapter
            .view_creation_statement(&relation("user_view"))
            .unwrap();
        println!("{statement}");
        assert_eq!(
            statement,
            "SELECT definition FROM pg_catalog.pg_views WHERE schemaname = 'public' AND viewname = 'user_view'"
        );
    }

    #[test]
    fn test_directionally_wrap_statement() {
        let adapter = PostgresAdapter;
        let users = relation("users");
        let statement = r#"SELECT * FROM "public"."users" WHERE id IN (1,2)"#;
        let by_rows = adapter
            .directionally_wrap_statement(
                statement,
                &users,
                Some(&SampleMethod::bernoulli_rows(1000).unwrap()),
            )
            .unwrap();
        println!("{by_rows}");
        assert!(by_rows.contains("ORDER BY RANDOM() LIMIT 1000"));
        let by_percent = adapter
            .directionally_wrap_statement(
                statement,
                &users,
                Some(&SampleMethod::bernoulli_percent(10.0).unwrap()),
            )
            .unwrap();
        println!("{by_percent}");
        assert!(by_percent.contains("WHERE RANDOM() < 0.1"));
        assert!(by_percent.starts_with(&format!(
            "WITH {} AS (\n{statement}\n)",
            adapter.scoped_cte(&users, namer::FINAL_SAMPLE)
        )));
    }
}
