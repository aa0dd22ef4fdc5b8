//! Individuals and populations.
//!
//! An [`Individual`] is one candidate test input: a concrete value for every
//! transition-scoped guard variable in the graph. Individuals are value
//! objects — selection, crossover, and mutation always produce new
//! individuals, because one parent may be chosen into several offspring slots
//! within the same generation and must never be mutated through an alias.

use crate::graph::domain::{ScopedVar, VariableSpec, DEFAULT_MAX, DEFAULT_MIN};
use crate::guard::{Value, VarType};
use rand::Rng;
use std::collections::BTreeMap;

/// Coverage cardinality plus one. Higher is better; minimum 1.
pub type Fitness = usize;

/// Ordered sequence of individuals, fixed size across generations.
pub type Population = Vec<Individual>;

/// One full assignment of values to every scoped guard variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    genes: BTreeMap<ScopedVar, Value>,
}

impl Individual {
    /// Builds an individual from an explicit gene map.
    pub fn from_genes(genes: BTreeMap<ScopedVar, Value>) -> Individual {
        Individual { genes }
    }

    /// Samples an individual inside the extracted variable domains.
    ///
    /// Booleans are a fair coin; numeric variables sample uniformly in
    /// `[min, max]`. A degenerate domain (`min > max`, from contradictory
    /// guard constraints) is repaired first by widening one side: either
    /// `[min, 1000]` or `[-1000, max]`, with equal probability.
    pub fn random<R: Rng>(specs: &[VariableSpec], rng: &mut R) -> Individual {
        let genes = specs
            .iter()
            .map(|spec| {
                let value = match spec.ty {
                    VarType::Bool => Value::Bool(rng.random_bool(0.5)),
                    VarType::Int | VarType::Float => {
                        let (min, max) = repair_bounds(spec.min, spec.max, rng);
                        sample_numeric(spec.ty, min, max, rng)
                    }
                };
                (spec.var.clone(), value)
            })
            .collect();
        Individual { genes }
    }

    /// Samples an individual over the fixed wide default range, ignoring the
    /// extracted bounds.
    ///
    /// Used for the initial population so the search starts unbiased instead
    /// of pre-seeded inside the known-satisfying region.
    pub fn random_unbounded<R: Rng>(specs: &[VariableSpec], rng: &mut R) -> Individual {
        let genes = specs
            .iter()
            .map(|spec| {
                let value = match spec.ty {
                    VarType::Bool => Value::Bool(rng.random_bool(0.5)),
                    ty => sample_numeric(ty, DEFAULT_MIN, DEFAULT_MAX, rng),
                };
                (spec.var.clone(), value)
            })
            .collect();
        Individual { genes }
    }

    pub fn genes(&self) -> &BTreeMap<ScopedVar, Value> {
        &self.genes
    }

    pub fn get(&self, var: &ScopedVar) -> Option<Value> {
        self.genes.get(var).copied()
    }

    /// Overwrites one gene. Only meaningful on a fresh copy; the genetic
    /// operators clone before writing.
    pub(crate) fn set(&mut self, var: ScopedVar, value: Value) {
        self.genes.insert(var, value);
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

fn repair_bounds<R: Rng>(min: f64, max: f64, rng: &mut R) -> (f64, f64) {
    if min <= max {
        (min, max)
    } else if rng.random_bool(0.5) {
        (min, DEFAULT_MAX.max(min))
    } else {
        (DEFAULT_MIN.min(max), max)
    }
}

fn sample_numeric<R: Rng>(ty: VarType, min: f64, max: f64, rng: &mut R) -> Value {
    match ty {
        VarType::Int => {
            let lo = min.ceil() as i64;
            let hi = (max.floor() as i64).max(lo);
            Value::Int(rng.random_range(lo..=hi))
        }
        _ => Value::Float(rng.random_range(min..=max)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spec(name: &str, ty: VarType, min: f64, max: f64) -> VariableSpec {
        VariableSpec {
            var: ScopedVar::new("T1", name),
            ty,
            min,
            max,
        }
    }

    #[test]
    fn test_random_respects_domains() {
        let specs = vec![
            spec("b", VarType::Bool, DEFAULT_MIN, DEFAULT_MAX),
            spec("i", VarType::Int, 10.0, 20.0),
            spec("f", VarType::Float, -0.5, 0.5),
        ];
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let ind = Individual::random(&specs, &mut rng);
            assert_eq!(ind.len(), 3);
            match ind.get(&ScopedVar::new("T1", "i")) {
                Some(Value::Int(v)) => assert!((10..=20).contains(&v), "int {v} out of domain"),
                other => panic!("expected int gene, got {other:?}"),
            }
            match ind.get(&ScopedVar::new("T1", "f")) {
                Some(Value::Float(v)) => assert!((-0.5..=0.5).contains(&v)),
                other => panic!("expected float gene, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_pinned_domain_samples_exact_value() {
        let specs = vec![spec("x", VarType::Int, 42.0, 42.0)];
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let ind = Individual::random(&specs, &mut rng);
            assert_eq!(ind.get(&ScopedVar::new("T1", "x")), Some(Value::Int(42)));
        }
    }

    #[test]
    fn test_degenerate_domain_repaired() {
        // min > max: samples must land in [min, 1000] or [-1000, max].
        let specs = vec![spec("x", VarType::Int, 500.0, 100.0)];
        let mut rng = StdRng::seed_from_u64(7);
        let (mut high_side, mut low_side) = (0, 0);
        for _ in 0..400 {
            let ind = Individual::random(&specs, &mut rng);
            let Some(Value::Int(v)) = ind.get(&ScopedVar::new("T1", "x")) else {
                panic!("expected int gene");
            };
            if (500..=1000).contains(&v) {
                high_side += 1;
            } else if (-1000..=100).contains(&v) {
                low_side += 1;
            } else {
                panic!("sample {v} escaped both repaired ranges");
            }
        }
        assert!(
            high_side > 100 && low_side > 100,
            "both repair branches should be taken: high={high_side}, low={low_side}"
        );
    }

    #[test]
    fn test_unbounded_ignores_extracted_domain() {
        let specs = vec![spec("x", VarType::Float, 0.0, 0.001)];
        let mut rng = StdRng::seed_from_u64(3);
        let escaped = (0..100)
            .map(|_| Individual::random_unbounded(&specs, &mut rng))
            .filter(|ind| match ind.get(&ScopedVar::new("T1", "x")) {
                Some(Value::Float(v)) => !(0.0..=0.001).contains(&v),
                _ => false,
            })
            .count();
        assert!(
            escaped > 90,
            "unbounded sampling should not stay in the tight domain, escaped={escaped}"
        );
    }

    #[test]
    fn test_domain_round_trip_satisfies_guard() {
        // A value sampled from the `fuel_quantity <= 300` domain satisfies
        // the original (unscoped) guard.
        use std::collections::HashMap;
        let specs = vec![spec("fuel_quantity", VarType::Float, DEFAULT_MIN, 300.0)];
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let ind = Individual::random(&specs, &mut rng);
            let Some(value) = ind.get(&ScopedVar::new("T1", "fuel_quantity")) else {
                panic!("gene missing");
            };
            let bindings: HashMap<String, Value> = [("fuel_quantity".to_string(), value)].into();
            assert!(crate::guard::evaluate("fuel_quantity <= 300", &bindings));
        }
    }

    #[test]
    fn test_value_semantics() {
        let specs = vec![spec("x", VarType::Int, 0.0, 10.0)];
        let mut rng = StdRng::seed_from_u64(5);
        let original = Individual::random(&specs, &mut rng);
        let mut copy = original.clone();
        copy.set(ScopedVar::new("T1", "x"), Value::Int(-99));
        assert_ne!(original.get(&ScopedVar::new("T1", "x")), Some(Value::Int(-99)));
    }
}
