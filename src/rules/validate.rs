// src/rules/validate.rs

//! Static checks over a parsed program.
//!
//! Nothing here runs implicitly: a program with a dangling or cyclic hook
//! still loads, and fails only when that template is run. `poul check`
//! uses these checks to report such problems up front.

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graphmap::DiGraphMap;

use crate::errors::{PoulError, Result};
use crate::rules::model::Program;

/// Run every static check, stopping at the first problem.
pub fn validate_program(program: &Program) -> Result<()> {
    validate_hook_references(program)?;
    validate_hook_graph(program)?;
    Ok(())
}

fn validate_hook_references(program: &Program) -> Result<()> {
    for template in program.templates().values() {
        for hook in template.prehooks.iter().chain(&template.posthooks) {
            if program.template(hook).is_none() {
                return Err(PoulError::TemplateNotFound(format!(
                    "{hook} (hook of template '{}')",
                    template.name
                )));
            }
        }
    }
    Ok(())
}

fn validate_hook_graph(program: &Program) -> Result<()> {
    // Edge template -> hook, for pre and post hooks alike.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in program.templates().keys() {
        graph.add_node(name.as_str());
    }
    for template in program.templates().values() {
        for hook in template.prehooks.iter().chain(&template.posthooks) {
            graph.add_edge(template.name.as_str(), hook.as_str(), ());
        }
    }

    let Err(cycle) = toposort(&graph, None) else {
        return Ok(());
    };

    let node = cycle.node_id();
    let members = tarjan_scc(&graph)
        .into_iter()
        .find(|scc| scc.contains(&node))
        .unwrap_or_else(|| vec![node]);

    let mut members: Vec<&str> = members;
    members.sort_unstable();

    Err(PoulError::CyclicHook {
        chain: format!("templates {} hook into each other", members.join(", ")),
    })
}
