//! Parsing the text simulation format (spec §6) into `sigflow_core` types.
//!
//! One file may reference others via `Subsystem <id> <filename>`; those are
//! parsed recursively, appending their blocks into the same flat arena the
//! top-level file's blocks live in (design notes §9), so a `BlockId` means
//! the same thing no matter which file declared the block.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sigflow_core::block::variants::{
    adder::Adder, amplifier::Amplifier, comparator::Comparator, constant::Constant,
    differentiator::Differentiator, function::Function, generator::Generator,
    integrator::Integrator, inverter::Inverter, multiplier::Multiplier, ode::Ode, scope::Scope,
    subsystem::Subsystem, switch::Switch,
};
use sigflow_core::block::Block;
use sigflow_core::connection::Connection;
use sigflow_core::parameter::{Equation, Parameter, ParameterTable};
use sigflow_core::topo::topo_sort;
use sigflow_core::{Simulation, SimulationConfig};

use crate::error::{FormatError, Result};

/// Everything one file (top-level or `Subsystem`-included) contributes.
struct ParsedFile {
    ids: HashMap<String, usize>,
    /// Arena indices of blocks this file declared directly, in file order —
    /// used as the scope for this level's own topological sort.
    own_indices: Vec<usize>,
    connections: Vec<Connection>,
    parameters: ParameterTable,
    equations: Vec<Equation>,
    dt: Option<f64>,
    horizon: Option<f64>,
}

/// The result of [`load_simulation_from_file`] before the engine sorts and
/// snapshots it.
pub struct LoadedSimulation {
    pub simulation: Simulation,
    /// `TIME`'s horizon, if declared — the engine itself has no notion of a
    /// fixed run length, only `dt`, so this is returned for the caller
    /// (`sigflow-cli`) to decide how long to `run` for.
    pub horizon: Option<f64>,
}

/// Load a `.sim` file (spec §6) into a ready-to-run [`Simulation`].
pub fn load_simulation_from_file(path: impl AsRef<Path>) -> Result<LoadedSimulation> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    let mut blocks: Vec<Block> = Vec::new();
    let parsed = parse_into(&text, &base_dir, &mut blocks)?;

    let dt = parsed.dt.ok_or(FormatError::MissingTime)?;
    let simulation = Simulation::construct(blocks, parsed.connections, dt, 0.0, parsed.parameters, parsed.equations)?;

    Ok(LoadedSimulation { simulation, horizon: parsed.horizon })
}

/// Same as [`load_simulation_from_file`] but also applies `config`
/// (iteration/tolerance overrides) before returning.
pub fn load_simulation_with_config(path: impl AsRef<Path>, config: SimulationConfig) -> Result<LoadedSimulation> {
    let mut loaded = load_simulation_from_file(path)?;
    loaded.simulation.set_config(config);
    Ok(loaded)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

/// Split a line into whitespace-separated tokens, treating a
/// double-quoted span as one token with its quotes removed — needed for
/// expression arguments like `Generator "sin(t)"`.
fn tokenize_line(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '"' {
            chars.next();
            let mut token = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                token.push(c);
            }
            if !closed {
                return Err(FormatError::MalformedArguments(line.to_string()));
            }
            tokens.push(token);
        } else {
            let mut token = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
            tokens.push(token);
        }
    }

    Ok(tokens)
}

fn parse_f64(token: &str, line: &str) -> Result<f64> {
    token.parse::<f64>().map_err(|_| FormatError::MalformedArguments(line.to_string()))
}

/// Substitute `arg` with a declared parameter's resolved value, if `arg`
/// names one; otherwise return `arg` unchanged (spec §6).
fn resolve_arg(arg: &str, parameters: &ParameterTable) -> String {
    match parameters.get(arg) {
        Some(v) => v.to_string(),
        None => arg.to_string(),
    }
}

fn build_block(id: &str, type_name: &str, args: &[String], line: &str) -> Result<Block> {
    let block = match type_name {
        "Constant" => {
            let v = parse_f64(args.first().ok_or_else(|| FormatError::MalformedArguments(line.to_string()))?, line)?;
            Block::Constant(Constant::new(id, v))
        }
        "Amplifier" => {
            let k = parse_f64(args.first().ok_or_else(|| FormatError::MalformedArguments(line.to_string()))?, line)?;
            Block::Amplifier(Amplifier::new(id, k))
        }
        "Inverter" => Block::Inverter(Inverter::new(id)),
        "Adder" => Block::Adder(Adder::new(id)),
        "Multiplier" => Block::Multiplier(Multiplier::new(id)),
        "Comparator" => {
            let theta = parse_f64(args.first().ok_or_else(|| FormatError::MalformedArguments(line.to_string()))?, line)?;
            Block::Comparator(Comparator::new(id, theta))
        }
        "Generator" => {
            let source = args.first().ok_or_else(|| FormatError::MalformedArguments(line.to_string()))?;
            Block::Generator(Generator::new(id, source)?)
        }
        "Function" => {
            let source = args.first().ok_or_else(|| FormatError::MalformedArguments(line.to_string()))?;
            Block::Function(Function::new(id, source)?)
        }
        "Integrator" => {
            let x0 = parse_f64(args.first().ok_or_else(|| FormatError::MalformedArguments(line.to_string()))?, line)?;
            Block::Integrator(Integrator::new(id, x0))
        }
        "Differentiator" => Block::Differentiator(Differentiator::new(id)),
        "ODE" => {
            if args.len() < 3 {
                return Err(FormatError::MalformedArguments(line.to_string()));
            }
            let x0 = parse_f64(&args[0], line)?;
            Block::Ode(Ode::new(id, x0, &args[1], &args[2])?)
        }
        "Switch" => Block::Switch(Switch::new(id)),
        "Scope" => {
            let label = args.first().cloned().unwrap_or_else(|| id.to_string());
            Block::Scope(Scope::new(id, label))
        }
        other => return Err(FormatError::UnknownBlockType(other.to_string())),
    };
    Ok(block)
}

fn parse_into(text: &str, base_dir: &Path, blocks: &mut Vec<Block>) -> Result<ParsedFile> {
    let mut ids: HashMap<String, usize> = HashMap::new();
    let mut own_indices: Vec<usize> = Vec::new();
    let mut connection_lines: Vec<(String, String, String)> = Vec::new();
    let mut states: Vec<(String, f64)> = Vec::new();
    let mut parameters = ParameterTable::new();
    let mut equations = Vec::new();
    let mut dt = None;
    let mut horizon = None;

    for raw_line in text.lines() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let tokens = tokenize_line(line)?;
        if tokens.is_empty() {
            continue;
        }

        match tokens[0].as_str() {
            "BLOCK" => {
                if tokens.len() < 3 {
                    return Err(FormatError::MalformedArguments(line.to_string()));
                }
                let id = tokens[1].clone();
                if ids.contains_key(&id) {
                    return Err(FormatError::DuplicateId(id));
                }
                let type_name = tokens[2].clone();
                let args: Vec<String> = tokens[3..].iter().map(|a| resolve_arg(a, &parameters)).collect();

                let idx = if type_name == "Subsystem" {
                    let filename = args.first().ok_or_else(|| FormatError::MalformedArguments(line.to_string()))?;
                    let sub_path = base_dir.join(filename);
                    let sub_text = std::fs::read_to_string(&sub_path)?;
                    let sub_base_dir = sub_path.parent().map(Path::to_path_buf).unwrap_or_else(|| base_dir.to_path_buf());
                    let sub = parse_into(&sub_text, &sub_base_dir, blocks)?;
                    let inner_order = topo_sort(blocks, &sub.own_indices);
                    blocks.push(Block::Subsystem(Subsystem::new(id.clone(), &sub.own_indices, inner_order, sub.connections)));
                    blocks.len() - 1
                } else {
                    blocks.push(build_block(&id, &type_name, &args, line)?);
                    blocks.len() - 1
                };

                ids.insert(id, idx);
                own_indices.push(idx);
            }
            "CONNECTION" => {
                if tokens.len() < 4 {
                    return Err(FormatError::MalformedArguments(line.to_string()));
                }
                connection_lines.push((tokens[1].clone(), tokens[2].clone(), tokens[3].clone()));
            }
            "STATE" => {
                if tokens.len() < 3 {
                    return Err(FormatError::MalformedArguments(line.to_string()));
                }
                states.push((tokens[1].clone(), parse_f64(&tokens[2], line)?));
            }
            "PARAMETER" => {
                if tokens.len() < 2 {
                    return Err(FormatError::MalformedArguments(line.to_string()));
                }
                let name = tokens[1].clone();
                if tokens.len() >= 3 {
                    parameters.declare(Parameter::bound(name, parse_f64(&tokens[2], line)?));
                } else {
                    parameters.declare(Parameter::unbound(name));
                }
            }
            "EQUATION" => {
                let rest = line.splitn(2, char::is_whitespace).nth(1).unwrap_or("").trim();
                let equation = Equation::parse(rest)?;
                // Applied immediately (not just queued) so a `BLOCK` line
                // later in this same file can reference the bound name via
                // `resolve_arg` — the engine's own `solve_equations` re-runs
                // this list at `construct`, which is a harmless no-op replay
                // since every equation is a pure function of the table.
                equation.apply(&mut parameters)?;
                equations.push(equation);
            }
            "TIME" => {
                if tokens.len() < 3 {
                    return Err(FormatError::MalformedArguments(line.to_string()));
                }
                dt = Some(parse_f64(&tokens[1], line)?);
                horizon = Some(parse_f64(&tokens[2], line)?);
            }
            other => return Err(FormatError::UnknownLinePrefix(other.to_string())),
        }
    }

    let mut connections = Vec::with_capacity(connection_lines.len());
    for (source_id, target_id, target_input) in connection_lines {
        let source = *ids.get(&source_id).ok_or_else(|| FormatError::UnknownId(source_id.clone()))?;
        let target = *ids.get(&target_id).ok_or_else(|| FormatError::UnknownId(target_id.clone()))?;
        connections.push(Connection::new(source, target, target_input));
    }

    for (id, value) in states {
        let idx = *ids.get(&id).ok_or_else(|| FormatError::UnknownId(id))?;
        blocks[idx].core_mut().output = value;
    }

    Ok(ParsedFile { ids, own_indices, connections, parameters, equations, dt, horizon })
}
