//! # Methods to display the dependency graph of a replica
//!
//! The graph is rendered with graphviz in an HTML page.
//!

pub mod colors;
pub mod dot;

use crate::{graph::DependencyGraph, namer};
use std::{
    fs::File,
    io::{Result, Write},
    path::PathBuf,
};
#[cfg(feature = "graphviz_display")]
use std::process::Command;

pub trait Dot {
    /// Write an HTML page rendering the object, return its path
    fn display_dot(&self) -> Result<PathBuf>;
}

const HTML_HEADER: &str = r##"<!DOCTYPE html>
<!-- Inspired from https://gist.github.com/magjac/a23d1f1405c2334f288a9cca4c0ef05b -->
<meta charset="utf-8">
"##;
const HTML_DARK_STYLE: &str = r##"<style>
#graph {
    background-color: #2b303a;
    height: 100%;
    width: 100%;
}
#graph svg {
    height: 100%;
    width: 100%;
}
</style>
"##;
const HTML_BODY: &str = r##"<body>
<script src="https://d3js.org/d3.v5.min.js"></script>
<script src="https://unpkg.com/@hpcc-js/wasm@0.3.11/dist/index.min.js"></script>
<script src="https://unpkg.com/d3-graphviz@3.0.5/build/d3-graphviz.js"></script>
<div id="graph" style="text-align: center; display: block; position: absolute;"></div>
<script>
d3.select("#graph").graphviz().engine("dot")
.renderDot(`"##;
const HTML_FOOTER: &str = r##"`);
</script>
"##;

impl Dot for DependencyGraph {
    fn display_dot(&self) -> Result<PathBuf> {
        let names: Vec<String> = self.relations().map(|r| r.name().to_string()).collect();
        let name = namer::name_from_content("dependencies", &names);
        let path = std::env::temp_dir().join(format!("{name}.html"));
        let mut output = File::create(&path)?;
        output.write_all(HTML_HEADER.as_bytes())?;
        output.write_all(HTML_DARK_STYLE.as_bytes())?;
        output.write_all(HTML_BODY.as_bytes())?;
        self.dot(&mut output, &["dark"])?;
        output.write_all(HTML_FOOTER.as_bytes())?;
        #[cfg(feature = "graphviz_display")]
        Command::new("open").arg(&path).output()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builder::{Ready, With},
        data_type::DataType,
        graph::Edge,
        relation::{QualifiedName, Relation},
    };
    use std::fs;

    #[test]
    fn test_display_dot() {
        let mut graph = DependencyGraph::new();
        for name in ["CUSTOMERS", "INVOICES"] {
            graph
                .add_relation(
                    Relation::builder()
                        .database("DB")
                        .schema("SALES")
                        .name(name)
                        .with(("ID", DataType::Integer))
                        .build(),
                )
                .unwrap();
        }
        graph
            .add_edge(
                &QualifiedName::new("DB", "SALES", "CUSTOMERS"),
                &QualifiedName::new("DB", "SALES", "INVOICES"),
                Edge::directional("CUSTOMER_ID", "ID"),
            )
            .unwrap();
        let path = graph.display_dot().unwrap();
        println!("written to {}", path.display());
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("digraph dependencies"));
        assert!(html.contains("DB.SALES.INVOICES"));
        fs::remove_file(path).unwrap();
    }
}
