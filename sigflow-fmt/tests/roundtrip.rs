//! Parsing and writing the text simulation format (spec §6), including the
//! save/load round-trip invariant from spec §8.

use std::fs;

use sigflow_fmt::{load_simulation_from_file, FormatError};

#[test]
fn loads_a_simple_chain_and_runs_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chain.sim");
    fs::write(
        &path,
        r#"
        # S1 from the scenario catalog
        BLOCK c Constant 3.0
        BLOCK amp Amplifier 2.5
        BLOCK s Scope out
        CONNECTION c amp input
        CONNECTION amp s input
        TIME 0.1 1.0
        "#,
    )
    .unwrap();

    let mut loaded = load_simulation_from_file(&path).unwrap();
    assert_eq!(loaded.horizon, Some(1.0));
    loaded.simulation.update().unwrap();
    assert_eq!(loaded.simulation.get_outputs()["out"], 7.5);
}

#[test]
fn parameters_and_equations_resolve_before_block_construction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.sim");
    fs::write(
        &path,
        r#"
        PARAMETER base 2.0
        PARAMETER doubled
        EQUATION doubled = base * 2
        BLOCK c Constant 1.0
        BLOCK amp Amplifier doubled
        BLOCK s Scope out
        CONNECTION c amp input
        CONNECTION amp s input
        TIME 0.1 1.0
        "#,
    )
    .unwrap();

    let mut loaded = load_simulation_from_file(&path).unwrap();
    loaded.simulation.update().unwrap();
    assert_eq!(loaded.simulation.get_outputs()["out"], 4.0);
}

#[test]
fn state_line_overrides_the_constructed_initial_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.sim");
    fs::write(
        &path,
        r#"
        BLOCK i Integrator 0.0
        STATE i 5.0
        TIME 0.1 1.0
        "#,
    )
    .unwrap();

    let loaded = load_simulation_from_file(&path).unwrap();
    assert_eq!(loaded.simulation.get_state(), vec![5.0]);
}

#[test]
fn subsystem_line_loads_the_referenced_file_into_the_shared_arena() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("inner.sim"),
        r#"
        BLOCK amp Amplifier 2.0
        "#,
    )
    .unwrap();
    fs::write(
        dir.path().join("outer.sim"),
        r#"
        BLOCK c Constant 3.0
        BLOCK sub Subsystem inner.sim
        BLOCK s Scope out
        CONNECTION c sub input
        CONNECTION sub s input
        TIME 0.1 1.0
        "#,
    )
    .unwrap();

    let mut loaded = load_simulation_from_file(dir.path().join("outer.sim")).unwrap();
    // A subsystem's output publishes only at commit (spec §4.8), so a
    // downstream Scope catches up one tick later.
    loaded.simulation.update().unwrap();
    loaded.simulation.update().unwrap();
    assert_eq!(loaded.simulation.get_outputs()["out"], 6.0);
}

#[test]
fn unknown_line_prefix_is_a_structural_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.sim");
    fs::write(&path, "WIDGET foo\nTIME 0.1 1.0\n").unwrap();

    let err = load_simulation_from_file(&path).unwrap_err();
    assert!(matches!(err, FormatError::UnknownLinePrefix(prefix) if prefix == "WIDGET"));
}

#[test]
fn missing_time_line_is_a_structural_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notime.sim");
    fs::write(&path, "BLOCK c Constant 1.0\n").unwrap();

    let err = load_simulation_from_file(&path).unwrap_err();
    assert!(matches!(err, FormatError::MissingTime));
}

#[test]
fn save_then_load_reproduces_identical_traces() {
    use sigflow_core::block::variants::{amplifier::Amplifier, constant::Constant, scope::Scope};
    use sigflow_core::block::Block;
    use sigflow_core::SimulationBuilder;

    let mut builder = SimulationBuilder::new(0.1);
    let c = builder.add(Block::Constant(Constant::new("c", 3.0)));
    let amp = builder.add(Block::Amplifier(Amplifier::new("amp", 2.5)));
    let scope = builder.add(Block::Scope(Scope::new("s", "out")));
    builder.connect(c, amp, "input");
    builder.connect(amp, scope, "input");
    let mut original = builder.build().unwrap();
    let original_trace = original.run(0.5).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.sim");
    sigflow_fmt::save(&original, &path, 0.5).unwrap();

    let mut reloaded = load_simulation_from_file(&path).unwrap();
    let reloaded_trace = reloaded.simulation.run(0.5).unwrap();

    assert_eq!(original_trace.samples, reloaded_trace.samples);
}

#[test]
fn save_then_load_round_trips_a_subsystem() {
    use sigflow_core::block::variants::{amplifier::Amplifier, constant::Constant, scope::Scope};
    use sigflow_core::block::{Block, Subsystem};
    use sigflow_core::topo::topo_sort;
    use sigflow_core::SimulationBuilder;

    let mut builder = SimulationBuilder::new(0.1);
    let c = builder.add(Block::Constant(Constant::new("c", 3.0)));
    let inner_amp = builder.add(Block::Amplifier(Amplifier::new("inner_amp", 2.0)));
    let declaration_order = [inner_amp];
    let inner_order = topo_sort(builder.blocks(), &declaration_order);
    let sub = builder.add(Block::Subsystem(Subsystem::new("sub", &declaration_order, inner_order, Vec::new())));
    let scope = builder.add(Block::Scope(Scope::new("s", "out")));
    builder.connect(c, sub, "input");
    builder.connect(sub, scope, "input");
    let original = builder.build().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("outer.sim");
    sigflow_fmt::save(&original, &path, 0.5).unwrap();
    assert!(dir.path().join("sub.sim").exists());

    let mut reloaded = load_simulation_from_file(&path).unwrap();
    reloaded.simulation.update().unwrap();
    reloaded.simulation.update().unwrap();
    assert_eq!(reloaded.simulation.get_outputs()["out"], 6.0);
}
