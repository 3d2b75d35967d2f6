use super::colors::*;
use dot::{GraphWalk, Labeller, Style};
use std::io::{self, Write};

/// Renders graph `g` into the writer `w` in DOT syntax, with the replica styling.
/// Pass `"dark"` in `opts` for the dark theme.
pub fn render<
    'a,
    N: Clone + 'a,
    E: Clone + 'a,
    G: Labeller<'a, N, E> + GraphWalk<'a, N, E>,
    W: Write,
>(
    g: &'a G,
    w: &mut W,
    opts: &[&str],
) -> io::Result<()> {
    fn writeln<W: Write>(w: &mut W, arg: &[&str]) -> io::Result<()> {
        for &s in arg {
            w.write_all(s.as_bytes())?;
        }
        writeln!(w)
    }

    fn indent<W: Write>(w: &mut W) -> io::Result<()> {
        w.write_all(b"    ")
    }

    writeln(w, &["digraph ", g.graph_id().as_slice(), " {"])?;
    writeln(
        w,
        &[r##"
        rankdir="LR";
        splines=true;
        overlap=false;
        nodesep="0.3";
        ranksep="0.6";
        fontname="Red Hat Text";
        fontsize="11pt"
        bgcolor="#00000000""##],
    )?;
    let foreground = if opts.contains(&"dark") {
        "#ffffffbb"
    } else {
        "#2B303A"
    };
    writeln(
        w,
        &[
            r##"
        node [ shape="box" style="filled,rounded" margin=0.2, fontname="Red Hat Display,sans-serif", fontsize="11pt", color=""##,
            foreground,
            r##"" ]
        edge [ fontname="Red Hat Text" fontcolor=""##,
            foreground,
            r##"" color=""##,
            foreground,
            r##"" ]"##,
        ],
    )?;
    for n in g.nodes().iter() {
        let colorstring;
        indent(w)?;
        let id = g.node_id(n);
        let escaped = &g.node_label(n).to_dot_string();
        let mut text = vec![id.as_slice(), "[label=", escaped, "]"];
        let style = g.node_style(n);
        if style != Style::None {
            text.extend(["[style=\"", style.as_slice(), "\"]"]);
        }
        if let Some(color) = g.node_color(n) {
            // Light fills get a dark font
            let font = match &color {
                dot::LabelText::LabelStr(c) if c.as_ref().eq_ignore_ascii_case(LIGHT_GREEN) => {
                    "#000000bb"
                }
                dot::LabelText::LabelStr(c)
                    if [DARK_GREEN, MEDIUM_GREEN, MEDIUM_RED]
                        .iter()
                        .any(|dark| c.as_ref().eq_ignore_ascii_case(dark)) =>
                {
                    "#ffffffbb"
                }
                _ => "black",
            };
            colorstring = color.to_dot_string();
            text.extend(["[fillcolor=", &colorstring, "][fontcolor=\"", font, "\"]"]);
        }
        text.push(";");
        writeln(w, &text)?;
    }

    for e in g.edges().iter() {
        let escaped_label = &g.edge_label(e).to_dot_string();
        indent(w)?;
        let source = g.source(e);
        let target = g.target(e);
        let source_id = g.node_id(&source);
        let target_id = g.node_id(&target);
        let mut text = vec![
            source_id.as_slice(),
            " -> ",
            target_id.as_slice(),
            "[label=",
            escaped_label,
            "]",
        ];
        let style = g.edge_style(e);
        if style != Style::None {
            text.extend(["[style=\"", style.as_slice(), "\"]"]);
        }
        text.push(";");
        writeln(w, &text)?;
    }

    writeln(w, &["}"])
}
