//! The shipped demo configuration loads cleanly against the built-in stack.

use rigging_conf::{load_path, load_path_with_overrides, Value};
use std::path::PathBuf;

#[path = "../src/stack.rs"]
mod stack;

fn demo_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../configs/actor_critic.rig")
}

#[test]
fn test_demo_config_loads() {
    let registry = stack::registry();
    let store = load_path(&demo_config(), &registry).expect("demo config must load");

    assert_eq!(
        store.get(None, "NavigationEnv", "name"),
        Some(&Value::Str("NavGrid-v0".to_string()))
    );
    assert_eq!(
        store.get(Some("ac"), "Adam", "learning_rate"),
        Some(&Value::Float(1e-3))
    );
    assert_eq!(
        store.get(None, "Trainer", "num_iterations"),
        Some(&Value::Int(1000000))
    );
}

#[test]
fn test_demo_config_constructs_trainer() {
    let registry = stack::registry();
    let store = load_path(&demo_config(), &registry).expect("demo config must load");

    let object = store
        .construct(&registry, None, "Trainer")
        .expect("trainer spec");
    let spec = object
        .downcast::<stack::TrainerSpec>()
        .ok()
        .expect("trainer spec type");

    assert_eq!(spec.num_iterations, 1000000);
    assert_eq!(spec.unroll_length, 100);
    assert!(spec.evaluate);
    assert!(!spec.debug_summaries);
    assert_eq!(
        spec.algorithm.as_ref().map(|s| s.name.as_str()),
        Some("ActorCriticAlgorithm")
    );
}

#[test]
fn test_demo_config_with_override() {
    let registry = stack::registry();
    let store = load_path_with_overrides(
        &demo_config(),
        &["Trainer.num_iterations = 10".to_string()],
        &registry,
    )
    .expect("demo config must load");

    assert_eq!(
        store.get(None, "Trainer", "num_iterations"),
        Some(&Value::Int(10))
    );
}
