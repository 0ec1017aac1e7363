use std::fmt;
use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use granary_store::{ContainerStore, StoreResult};
use granary_types::Cereal;

/// A sequence of store operations read from TOML.
///
/// ```toml
/// [[op]]
/// action = "add"
/// kind = "buckwheat"
/// amount = 8.0
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default, rename = "op")]
    pub ops: Vec<Operation>,
}

/// One call against a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Operation {
    Add { kind: Cereal, amount: f32 },
    Withdraw { kind: Cereal, amount: f32 },
    Reclaim { kind: Cereal },
    Amount { kind: Cereal },
    Space { kind: Cereal },
}

/// What a successful operation returned.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Leftover(f32),
    Removed(f32),
    Reclaimed(bool),
    Amount(f32),
    Space(f32),
}

/// The result of one script step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Outcome {
    /// 1-based position in the script.
    pub step: usize,
    pub op: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl Script {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("parsing operation script")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// The walkthrough used by `granary demo`: fill, overflow, run out of
    /// container slots, then free one up and reuse it.
    pub fn demo() -> Self {
        use Operation::*;
        Self {
            ops: vec![
                Add { kind: Cereal::Buckwheat, amount: 8.0 },
                Amount { kind: Cereal::Buckwheat },
                Add { kind: Cereal::Buckwheat, amount: 6.0 },
                Amount { kind: Cereal::Buckwheat },
                Add { kind: Cereal::Peas, amount: 7.0 },
                Add { kind: Cereal::Rice, amount: 1.0 },
                Withdraw { kind: Cereal::Buckwheat, amount: 4.0 },
                Amount { kind: Cereal::Buckwheat },
                Reclaim { kind: Cereal::Buckwheat },
                Withdraw { kind: Cereal::Buckwheat, amount: 6.0 },
                Reclaim { kind: Cereal::Buckwheat },
                Add { kind: Cereal::Rice, amount: 1.0 },
                Space { kind: Cereal::Rice },
            ],
        }
    }

    /// Apply every operation in order.
    ///
    /// A failed operation leaves the store untouched, so by default it is
    /// recorded and execution continues. With `strict`, the first failure
    /// aborts the run.
    pub fn run<S: ContainerStore<Cereal>>(
        &self,
        store: &mut S,
        strict: bool,
    ) -> anyhow::Result<Vec<Outcome>> {
        let mut outcomes = Vec::with_capacity(self.ops.len());
        for (i, op) in self.ops.iter().enumerate() {
            let step = i + 1;
            match op.apply(store) {
                Ok(value) => {
                    info!(step, %op, ?value, "applied");
                    outcomes.push(Outcome {
                        step,
                        op: op.clone(),
                        value: Some(value),
                        error: None,
                    });
                }
                Err(e) if strict => bail!("step {step} ({op}) failed: {e}"),
                Err(e) => {
                    warn!(step, %op, error = %e, "operation failed");
                    outcomes.push(Outcome {
                        step,
                        op: op.clone(),
                        value: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }
        Ok(outcomes)
    }
}

impl Operation {
    pub fn apply<S: ContainerStore<Cereal>>(&self, store: &mut S) -> StoreResult<Value> {
        Ok(match self {
            Self::Add { kind, amount } => Value::Leftover(store.add(*kind, *amount)?),
            Self::Withdraw { kind, amount } => Value::Removed(store.withdraw(kind, *amount)?),
            Self::Reclaim { kind } => Value::Reclaimed(store.reclaim_container(kind)),
            Self::Amount { kind } => Value::Amount(store.amount_of(kind)),
            Self::Space { kind } => Value::Space(store.free_space_of(kind)),
        })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { kind, amount } => write!(f, "add {kind} {amount}"),
            Self::Withdraw { kind, amount } => write!(f, "withdraw {kind} {amount}"),
            Self::Reclaim { kind } => write!(f, "reclaim {kind}"),
            Self::Amount { kind } => write!(f, "amount {kind}"),
            Self::Space { kind } => write!(f, "space {kind}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leftover(v) => write!(f, "leftover {v}"),
            Self::Removed(v) => write!(f, "removed {v}"),
            Self::Reclaimed(true) => write!(f, "reclaimed"),
            Self::Reclaimed(false) => write!(f, "not empty, kept"),
            Self::Amount(v) => write!(f, "amount {v}"),
            Self::Space(v) => write!(f, "free space {v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use granary_store::BoundedMultiContainerStore;

    fn make_store() -> BoundedMultiContainerStore<Cereal> {
        BoundedMultiContainerStore::new(10.0, 20.0).unwrap()
    }

    #[test]
    fn parse_script() {
        let script = Script::from_toml_str(
            r#"
            [[op]]
            action = "add"
            kind = "buckwheat"
            amount = 8

            [[op]]
            action = "withdraw"
            kind = "peas"
            amount = 1.5

            [[op]]
            action = "reclaim"
            kind = "rice"
            "#,
        )
        .unwrap();
        assert_eq!(
            script.ops,
            vec![
                Operation::Add { kind: Cereal::Buckwheat, amount: 8.0 },
                Operation::Withdraw { kind: Cereal::Peas, amount: 1.5 },
                Operation::Reclaim { kind: Cereal::Rice },
            ]
        );
    }

    #[test]
    fn parse_rejects_capitalised_kind() {
        let err = Script::from_toml_str("[[op]]\naction = \"amount\"\nkind = \"Peas\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn parse_empty_script() {
        assert!(Script::from_toml_str("").unwrap().ops.is_empty());
    }

    #[test]
    fn parse_rejects_unknown_action() {
        let err = Script::from_toml_str("[[op]]\naction = \"sift\"\nkind = \"rice\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn parse_rejects_missing_amount() {
        let err = Script::from_toml_str("[[op]]\naction = \"add\"\nkind = \"rice\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ops.toml");
        std::fs::write(&path, "[[op]]\naction = \"space\"\nkind = \"millet\"\n").unwrap();
        let script = Script::load(&path).unwrap();
        assert_eq!(script.ops, vec![Operation::Space { kind: Cereal::Millet }]);
    }

    #[test]
    fn apply_each_operation() {
        let mut store = make_store();
        let add = Operation::Add { kind: Cereal::Rice, amount: 12.0 };
        assert_eq!(add.apply(&mut store).unwrap(), Value::Leftover(2.0));
        let withdraw = Operation::Withdraw { kind: Cereal::Rice, amount: 3.0 };
        assert_eq!(withdraw.apply(&mut store).unwrap(), Value::Removed(3.0));
        let amount = Operation::Amount { kind: Cereal::Rice };
        assert_eq!(amount.apply(&mut store).unwrap(), Value::Amount(7.0));
        let space = Operation::Space { kind: Cereal::Rice };
        assert_eq!(space.apply(&mut store).unwrap(), Value::Space(3.0));
        let reclaim = Operation::Reclaim { kind: Cereal::Rice };
        assert_eq!(reclaim.apply(&mut store).unwrap(), Value::Reclaimed(false));
    }

    #[test]
    fn demo_script_outcomes() {
        let mut store = make_store();
        let outcomes = Script::demo().run(&mut store, false).unwrap();
        let results: Vec<Option<Value>> = outcomes.iter().map(|o| o.value.clone()).collect();
        assert_eq!(
            results,
            vec![
                Some(Value::Leftover(0.0)),
                Some(Value::Amount(8.0)),
                Some(Value::Leftover(4.0)),
                Some(Value::Amount(10.0)),
                Some(Value::Leftover(0.0)),
                None,
                Some(Value::Removed(4.0)),
                Some(Value::Amount(6.0)),
                Some(Value::Reclaimed(false)),
                Some(Value::Removed(6.0)),
                Some(Value::Reclaimed(true)),
                Some(Value::Leftover(0.0)),
                Some(Value::Space(9.0)),
            ]
        );
        assert!(outcomes[5].error.as_deref().unwrap().contains("no room"));
        assert_eq!(outcomes[5].step, 6);
        assert_eq!(store.snapshot(), vec![(Cereal::Rice, 1.0), (Cereal::Peas, 7.0)]);
    }

    #[test]
    fn strict_run_stops_at_first_failure() {
        let mut store = make_store();
        let err = Script::demo().run(&mut store, true).unwrap_err();
        assert!(err.to_string().contains("step 6"));
        // Steps before the failure were applied.
        assert_eq!(store.amount_of(&Cereal::Peas), 7.0);
        assert!(!store.has_container(&Cereal::Rice));
    }

    #[test]
    fn negative_amount_is_recorded() {
        let mut store = make_store();
        let script = Script {
            ops: vec![Operation::Withdraw { kind: Cereal::Bulgur, amount: -2.0 }],
        };
        let outcomes = script.run(&mut store, false).unwrap();
        assert!(!outcomes[0].is_ok());
    }

    #[test]
    fn outcome_json_shape() {
        let outcome = Outcome {
            step: 1,
            op: Operation::Add { kind: Cereal::Peas, amount: 7.0 },
            value: Some(Value::Leftover(0.0)),
            error: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["op"]["action"], "add");
        assert_eq!(json["op"]["kind"], "peas");
        assert_eq!(json["value"]["leftover"], 0.0);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn display_operation_and_value() {
        let op = Operation::Withdraw { kind: Cereal::Millet, amount: 2.5 };
        assert_eq!(op.to_string(), "withdraw Millet 2.5");
        assert_eq!(Value::Reclaimed(false).to_string(), "not empty, kept");
        assert_eq!(Value::Space(3.0).to_string(), "free space 3");
    }
}
