//! One file per block variant, the teacher's convention in
//! `bbx_dsp/src/blocks/effectors/*.rs`: a struct holding the variant's
//! parameters plus a [`crate::block::BlockCore`], and an inherent
//! `compute`/`commit` pair matched from [`crate::block::Block`].

pub mod adder;
pub mod amplifier;
pub mod comparator;
pub mod constant;
pub mod differentiator;
pub mod function;
pub mod generator;
pub mod integrator;
pub mod inverter;
pub mod multiplier;
pub mod ode;
pub mod scope;
pub mod subsystem;
pub mod switch;
