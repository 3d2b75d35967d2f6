use super::{DependencyGraph, Direction, Edge};
use crate::{
    display::{self, colors},
    namer,
    relation::Relation,
};
use std::io;

type Node<'a> = &'a Relation;
type Link<'a> = (&'a Relation, &'a Relation, &'a Edge);

fn node_label(relation: &Relation) -> String {
    let mut label = format!(
        "<b>{}</b><br/>{}",
        dot::escape_html(&relation.name().to_string().to_uppercase()),
        dot::escape_html(&relation.sampling().to_string())
    );
    if relation.is_view() {
        label.push_str("<br/>VIEW");
    } else if relation.unsampled() {
        label.push_str("<br/>UNSAMPLED");
    }
    if relation.include_outliers() {
        label.push_str(&format!(
            "<br/>OUTLIERS ≤ {}",
            relation.max_number_of_outliers()
        ));
    }
    if let Some(data) = relation.data() {
        label.push_str(&format!("<br/>{} rows realized", data.len()));
    }
    label
}

impl<'a> dot::Labeller<'a, Node<'a>, Link<'a>> for DependencyGraph {
    fn graph_id(&'a self) -> dot::Id<'a> {
        dot::Id::new("dependencies").unwrap()
    }

    fn node_id(&'a self, node: &Node<'a>) -> dot::Id<'a> {
        dot::Id::new(namer::name_from_content("relation", node.name())).unwrap()
    }

    fn node_label(&'a self, node: &Node<'a>) -> dot::LabelText<'a> {
        dot::LabelText::html(node_label(node))
    }

    fn node_color(&'a self, node: &Node<'a>) -> Option<dot::LabelText<'a>> {
        Some(dot::LabelText::label(if node.is_view() {
            colors::LIGHT_GREEN
        } else if node.unsampled() {
            colors::MEDIUM_GREEN
        } else if node.data().is_some() {
            colors::DARK_GREEN
        } else {
            colors::MEDIUM_RED
        }))
    }

    fn edge_label(&'a self, edge: &Link<'a>) -> dot::LabelText<'a> {
        dot::LabelText::label(format!(
            "{} → {}",
            edge.2.remote_attribute(),
            edge.2.local_attribute()
        ))
    }

    fn edge_style(&'a self, edge: &Link<'a>) -> dot::Style {
        match edge.2.direction() {
            Direction::Directional => dot::Style::None,
            Direction::Bidirectional => dot::Style::Dashed,
        }
    }
}

impl<'a> dot::GraphWalk<'a, Node<'a>, Link<'a>> for DependencyGraph {
    fn nodes(&'a self) -> dot::Nodes<'a, Node<'a>> {
        self.relations().collect()
    }

    fn edges(&'a self) -> dot::Edges<'a, Link<'a>> {
        DependencyGraph::edges(self).collect()
    }

    fn source(&'a self, edge: &Link<'a>) -> Node<'a> {
        edge.0
    }

    fn target(&'a self, edge: &Link<'a>) -> Node<'a> {
        edge.1
    }
}

impl DependencyGraph {
    /// Render the DependencyGraph to dot
    pub fn dot<W: io::Write>(&self, w: &mut W, opts: &[&str]) -> io::Result<()> {
        display::dot::render(self, w, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builder::{Ready, With},
        data_type::DataType,
        relation::{Dataset, QualifiedName},
    };

    #[test]
    fn test_dot() {
        let mut graph = DependencyGraph::new();
        for name in ["USERS", "ORDERS"] {
            graph
                .add_relation(
                    Relation::builder()
                        .database("DB")
                        .schema("PUBLIC")
                        .name(name)
                        .with(("ID", DataType::Integer))
                        .include_outliers(name == "ORDERS")
                        .build(),
                )
                .unwrap();
        }
        let users = QualifiedName::new("DB", "PUBLIC", "USERS");
        let orders = QualifiedName::new("DB", "PUBLIC", "ORDERS");
        graph
            .add_edge(&users, &orders, Edge::bidirectional("USER_ID", "ID"))
            .unwrap();
        graph
            .relation_mut(&users)
            .unwrap()
            .set_data(Some(Dataset::new().with_column("ID", [1, 2])));
        let mut output: Vec<u8> = Vec::new();
        graph.dot(&mut output, &[]).unwrap();
        let output = String::from_utf8(output).unwrap();
        println!("{output}");
        assert!(output.starts_with("digraph dependencies {"));
        assert!(output.contains("DB.PUBLIC.ORDERS"));
        assert!(output.contains("ID → USER_ID"));
        assert!(output.contains("dashed"));
        assert!(output.contains("2 rows realized"));
    }
}
