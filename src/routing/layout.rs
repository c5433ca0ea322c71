//! Bijective mapping between logical qubits and device sites

use crate::circuit_ir::Qubit;
use crate::topology::PhysicalQubit;
use crate::{Result, RouterError};
use std::collections::{BTreeMap, BTreeSet};

/// Live placement of logical qubits on physical qubits.
///
/// Every physical site has an entry (`None` when it holds no logical qubit)
/// and every logical qubit sits on exactly one site. The only mutation is
/// [`Layout::swap`], which exchanges the contents of two sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    phys_to_log: BTreeMap<PhysicalQubit, Option<Qubit>>,
    log_to_phys: BTreeMap<Qubit, PhysicalQubit>,
}

impl Layout {
    /// Build a layout from a physical-to-logical assignment.
    ///
    /// `initial` must place every qubit of `logical` on a distinct site of
    /// `physical`; sites it does not mention start empty.
    pub fn new(
        initial: &BTreeMap<PhysicalQubit, Qubit>,
        physical: &BTreeSet<PhysicalQubit>,
        logical: &BTreeSet<Qubit>,
    ) -> Result<Self> {
        let mut phys_to_log: BTreeMap<PhysicalQubit, Option<Qubit>> =
            physical.iter().map(|&p| (p, None)).collect();
        let mut log_to_phys = BTreeMap::new();

        for (&p, &l) in initial {
            let Some(slot) = phys_to_log.get_mut(&p) else {
                return Err(RouterError::mapping_error(format!(
                    "initial mapping uses {} which is not on the device",
                    p
                )));
            };
            if let Some(previous) = log_to_phys.insert(l, p) {
                return Err(RouterError::mapping_error(format!(
                    "{} is mapped to both {} and {}",
                    l, previous, p
                )));
            }
            *slot = Some(l);
        }

        let layout = Self {
            phys_to_log,
            log_to_phys,
        };
        layout.check_consistency(logical, physical)?;
        Ok(layout)
    }

    /// Site currently holding `qubit`
    pub fn physical(&self, qubit: Qubit) -> Result<PhysicalQubit> {
        self.log_to_phys
            .get(&qubit)
            .copied()
            .ok_or_else(|| RouterError::mapping_error(format!("{} has no physical site", qubit)))
    }

    /// Logical qubit held by `site`, if any
    pub fn logical(&self, site: PhysicalQubit) -> Option<Qubit> {
        self.phys_to_log.get(&site).copied().flatten()
    }

    /// Exchange the contents of two sites
    pub fn swap(&mut self, a: PhysicalQubit, b: PhysicalQubit) -> Result<()> {
        let (Some(&la), Some(&lb)) = (self.phys_to_log.get(&a), self.phys_to_log.get(&b)) else {
            return Err(RouterError::mapping_error(format!(
                "cannot swap {} and {}: site not on the device",
                a, b
            )));
        };

        self.phys_to_log.insert(a, lb);
        self.phys_to_log.insert(b, la);
        if let Some(l) = lb {
            self.log_to_phys.insert(l, a);
        }
        if let Some(l) = la {
            self.log_to_phys.insert(l, b);
        }

        if cfg!(debug_assertions) {
            self.check_bijection()?;
        }
        Ok(())
    }

    /// Verify the layout is a bijection over exactly `logical` and `physical`
    pub fn check_consistency(
        &self,
        logical: &BTreeSet<Qubit>,
        physical: &BTreeSet<PhysicalQubit>,
    ) -> Result<()> {
        if !self.log_to_phys.keys().eq(logical.iter()) {
            let missing: Vec<String> = logical
                .iter()
                .filter(|l| !self.log_to_phys.contains_key(l))
                .map(|l| l.to_string())
                .collect();
            return Err(RouterError::mapping_error(format!(
                "logical qubits do not match the circuit (unplaced: [{}])",
                missing.join(", ")
            )));
        }
        if !self.phys_to_log.keys().eq(physical.iter()) {
            return Err(RouterError::mapping_error(
                "physical sites do not match the device",
            ));
        }
        self.check_bijection()
    }

    fn check_bijection(&self) -> Result<()> {
        for (&l, &p) in &self.log_to_phys {
            if self.logical(p) != Some(l) {
                return Err(RouterError::mapping_error(format!(
                    "{} maps to {} but {} holds {:?}",
                    l,
                    p,
                    p,
                    self.logical(p)
                )));
            }
        }
        let occupied = self.phys_to_log.values().filter(|l| l.is_some()).count();
        if occupied != self.log_to_phys.len() {
            return Err(RouterError::mapping_error(format!(
                "{} occupied sites for {} logical qubits",
                occupied,
                self.log_to_phys.len()
            )));
        }
        Ok(())
    }

    /// Current physical-to-logical assignment of the occupied sites
    pub fn to_mapping(&self) -> BTreeMap<PhysicalQubit, Qubit> {
        self.phys_to_log
            .iter()
            .filter_map(|(&p, &l)| l.map(|l| (p, l)))
            .collect()
    }
}
