//! The concrete scenarios from spec §8, each built directly against the
//! programmatic surface (no `sigflow-fmt` text format involved here).

use sigflow_core::block::variants::{
    adder::Adder, amplifier::Amplifier, comparator::Comparator, constant::Constant,
    differentiator::Differentiator, generator::Generator, scope::Scope, switch::Switch,
};
use sigflow_core::block::Block;
use sigflow_core::{SimulationBuilder, SimulationConfig};

#[test]
fn s1_constant_through_amplifier() {
    let mut builder = SimulationBuilder::new(0.1);
    let c = builder.add(Block::Constant(Constant::new("c", 3.0)));
    let amp = builder.add(Block::Amplifier(Amplifier::new("amp", 2.5)));
    let scope = builder.add(Block::Scope(Scope::new("s", "out")));
    builder.connect(c, amp, "input");
    builder.connect(amp, scope, "input");

    let mut sim = builder.build().unwrap();
    for _ in 0..3 {
        sim.update().unwrap();
        assert_eq!(sim.get_outputs()["out"], 7.5);
    }
}

#[test]
fn s2_integrator_of_unit_step() {
    let mut builder = SimulationBuilder::new(0.1);
    let c = builder.add(Block::Constant(Constant::new("c", 1.0)));
    let integ = builder.add(Block::Integrator(sigflow_core::block::Integrator::new("i", 0.0)));
    builder.connect(c, integ, "input");

    let mut sim = builder.build().unwrap();
    let expected = [0.1, 0.2, 0.3];
    for exp in expected {
        sim.update().unwrap();
        let output = sim.get_state()[integ];
        assert!((output - exp).abs() < 1e-9, "expected {exp}, got {output}");
    }
}

#[test]
fn s3_sine_generator_derivative() {
    let dt = 1e-3;
    let mut builder = SimulationBuilder::new(dt);
    let gen = builder.add(Block::Generator(Generator::new("g", "sin(t)").unwrap()));
    let diff = builder.add(Block::Differentiator(Differentiator::new("d")));
    builder.connect(gen, diff, "input");

    let mut sim = builder.build().unwrap();
    let ticks = (1.0 / dt).round() as usize;
    for _ in 0..ticks {
        sim.update().unwrap();
    }
    let output = sim.get_state()[diff];
    assert!((output - 1.0_f64.cos()).abs() < 2e-3, "got {output}");
}

#[test]
fn s4_algebraic_loop_converges() {
    let mut builder = SimulationBuilder::new(0.1);
    builder = builder.with_config(SimulationConfig { max_iterations: 30, tolerance: 1e-6 });
    let c = builder.add(Block::Constant(Constant::new("c", 1.0)));
    let adder = builder.add(Block::Adder(Adder::new("add")));
    let amp = builder.add(Block::Amplifier(Amplifier::new("amp", 0.5)));
    builder.connect(c, adder, "a");
    builder.connect(amp, adder, "b");
    builder.connect(adder, amp, "input");

    let mut sim = builder.build().unwrap();
    let report = sim.update().unwrap();
    assert!(report.converged);
    let state = sim.get_state();
    assert!((state[adder] - 2.0).abs() < 1e-6);
    assert!((state[amp] - 1.0).abs() < 1e-6);
}

#[test]
fn s5_comparator_threshold() {
    let mut builder = SimulationBuilder::new(0.5);
    let gen = builder.add(Block::Generator(Generator::new("g", "t").unwrap()));
    let cmp = builder.add(Block::Comparator(Comparator::new("cmp", 2.5)));
    let scope = builder.add(Block::Scope(Scope::new("s", "out")));
    builder.connect(gen, cmp, "input");
    builder.connect(cmp, scope, "input");

    let mut sim = builder.build().unwrap();
    let expected = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0];
    for exp in expected {
        sim.update().unwrap();
        assert_eq!(sim.get_outputs()["out"], exp, "at time {}", sim.time());
    }
}

#[test]
fn s6_switch_gated_pass_through() {
    let mut builder = SimulationBuilder::new(0.1);
    let gen = builder.add(Block::Generator(Generator::new("g", "sin(t)").unwrap()));
    let cmp = builder.add(Block::Comparator(Comparator::new("cmp", 0.0)));
    let sw = builder.add(Block::Switch(Switch::new("sw")));
    let scope = builder.add(Block::Scope(Scope::new("s", "out")));
    builder.connect(gen, cmp, "input");
    builder.connect(gen, sw, "input");
    builder.connect(cmp, sw, "control");
    builder.connect(sw, scope, "input");

    let mut sim = builder.build().unwrap();
    for _ in 0..20 {
        sim.update().unwrap();
        let t = sim.time();
        let expected = t.sin().max(0.0);
        let got = sim.get_outputs()["out"];
        assert!((got - expected).abs() < 1e-9, "at t={t}: expected {expected}, got {got}");
    }
}

#[test]
fn invariant_reset_round_trip_reproduces_traces() {
    let mut builder = SimulationBuilder::new(0.1);
    let gen = builder.add(Block::Generator(Generator::new("g", "sin(t)").unwrap()));
    let scope = builder.add(Block::Scope(Scope::new("s", "out")));
    builder.connect(gen, scope, "input");

    let mut sim = builder.build().unwrap();
    let first = sim.run(1.0).unwrap();
    sim.reset();
    let second = sim.run(1.0).unwrap();
    assert_eq!(first.samples, second.samples);
}
