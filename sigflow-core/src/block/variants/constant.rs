use crate::block::BlockCore;
use crate::error::Result;

/// Emits a fixed value every tick; ignores time and inputs.
#[derive(Debug, Clone)]
pub struct Constant {
    pub core: BlockCore,
    pub value: f64,
}

impl Constant {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Constant { core: BlockCore::with_output(label, value), value }
    }

    pub(crate) fn compute(&mut self) -> Result<()> {
        self.core.output = self.value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_emits_its_value() {
        let mut c = Constant::new("c", 3.0);
        c.compute().unwrap();
        assert_eq!(c.core.output, 3.0);
    }
}
