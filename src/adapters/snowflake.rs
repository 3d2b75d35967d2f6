use super::{Error, Result, StatementAdapter};
use crate::{
    relation::Relation,
    sampling::{SampleKind, SampleMethod, Units},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnowflakeAdapter;

impl SnowflakeAdapter {
    pub fn new() -> Self {
        SnowflakeAdapter
    }
}

impl StatementAdapter for SnowflakeAdapter {
    fn name(&self) -> &str {
        "snowflake"
    }

    fn sample_clause(&self, sample_method: &SampleMethod) -> Result<String> {
        match (sample_method.kind(), sample_method.units()) {
            (SampleKind::Bernoulli, units) => Ok(format!("SAMPLE BERNOULLI ({units})")),
            (SampleKind::System, Units::Percent(percent)) => {
                Ok(format!("SAMPLE SYSTEM ({percent})"))
            }
            (SampleKind::System, Units::Rows(_)) => {
                Err(Error::unsupported_sample_method(sample_method, self.name()))
            }
        }
    }

    /// The body of the view definition, without its `CREATE VIEW ... AS` header
    fn view_creation_statement(&self, relation: &Relation) -> Result<String> {
        let ddl = format!(
            "GET_DDL('view', {})",
            self.literal(&self.quoted_dot_notation(relation).as_str().into())
        );
        Ok(format!(
            "SELECT SUBSTRING({ddl}, POSITION(' AS ' IN UPPER({ddl}))+3)"
        ))
    }
}
