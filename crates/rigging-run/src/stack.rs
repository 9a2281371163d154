//! Built-in experiment component stack.
//!
//! The binary validates configurations against a concrete set of registered
//! symbols: the specification objects of a small actor-critic training
//! stack. Factories read their parameters through [`TargetArgs`] and fall
//! back to the defaults below, so a configuration only needs to bind what
//! it changes.

use rigging_conf::{Object, ParamError, SymbolDescriptor, SymbolRegistry, SymbolValue, TargetArgs};
use std::sync::Arc;

/// Adam optimizer specification.
#[derive(Debug, Clone, PartialEq)]
pub struct AdamSpec {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub eps: f64,
}

impl Default for AdamSpec {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
        }
    }
}

/// Fully-connected policy/value network specification.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSpec {
    pub fc_layers: Vec<i64>,
    pub activation: String,
}

impl Default for NetworkSpec {
    fn default() -> Self {
        Self {
            fc_layers: vec![100, 100],
            activation: "tanh".to_string(),
        }
    }
}

/// Simulated navigation environment specification.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvSpec {
    pub name: String,
    pub num_parallel: usize,
    pub max_episode_steps: Option<usize>,
}

/// Actor-critic algorithm specification.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorCriticSpec {
    pub gamma: f64,
    pub entropy_regularization: f64,
    pub gradient_clipping: Option<f64>,
    pub actor_network: Option<SymbolValue>,
    pub value_network: Option<SymbolValue>,
    pub optimizer: Option<SymbolValue>,
}

/// Training-loop specification.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerSpec {
    pub env: Option<SymbolValue>,
    pub algorithm: Option<SymbolValue>,
    pub num_iterations: usize,
    pub unroll_length: usize,
    pub summary_interval: usize,
    pub checkpoint_interval: usize,
    pub evaluate: bool,
    pub debug_summaries: bool,
}

fn adam(args: &TargetArgs) -> Result<Object, ParamError> {
    let defaults = AdamSpec::default();
    Ok(Arc::new(AdamSpec {
        learning_rate: args
            .get_f64("learning_rate")?
            .unwrap_or(defaults.learning_rate),
        beta1: args.get_f64("beta1")?.unwrap_or(defaults.beta1),
        beta2: args.get_f64("beta2")?.unwrap_or(defaults.beta2),
        eps: args.get_f64("eps")?.unwrap_or(defaults.eps),
    }))
}

fn network(args: &TargetArgs) -> Result<Object, ParamError> {
    let defaults = NetworkSpec::default();
    Ok(Arc::new(NetworkSpec {
        fc_layers: args.get_i64_seq("fc_layers")?.unwrap_or(defaults.fc_layers),
        activation: args
            .get_str("activation")?
            .map(str::to_string)
            .unwrap_or(defaults.activation),
    }))
}

fn navigation_env(args: &TargetArgs) -> Result<Object, ParamError> {
    Ok(Arc::new(EnvSpec {
        name: args
            .get_str("name")?
            .ok_or_else(|| args.missing("name"))?
            .to_string(),
        num_parallel: args.get_usize("num_parallel")?.unwrap_or(1),
        max_episode_steps: args.get_usize("max_episode_steps")?,
    }))
}

fn actor_critic(args: &TargetArgs) -> Result<Object, ParamError> {
    Ok(Arc::new(ActorCriticSpec {
        gamma: args.get_f64("gamma")?.unwrap_or(0.99),
        entropy_regularization: args.get_f64("entropy_regularization")?.unwrap_or(0.0),
        gradient_clipping: args.get_f64("gradient_clipping")?,
        actor_network: args.get_symbol("actor_network")?.cloned(),
        value_network: args.get_symbol("value_network")?.cloned(),
        optimizer: args.get_symbol("optimizer")?.cloned(),
    }))
}

fn trainer(args: &TargetArgs) -> Result<Object, ParamError> {
    Ok(Arc::new(TrainerSpec {
        env: args.get_symbol("env")?.cloned(),
        algorithm: args.get_symbol("algorithm")?.cloned(),
        num_iterations: args.get_usize("num_iterations")?.unwrap_or(1000),
        unroll_length: args.get_usize("unroll_length")?.unwrap_or(8),
        summary_interval: args.get_usize("summary_interval")?.unwrap_or(50),
        checkpoint_interval: args.get_usize("checkpoint_interval")?.unwrap_or(10000),
        evaluate: args.get_bool("evaluate")?.unwrap_or(false),
        debug_summaries: args.get_bool("debug_summaries")?.unwrap_or(false),
    }))
}

/// Build the registry of experiment components.
pub fn registry() -> SymbolRegistry {
    let mut registry = SymbolRegistry::new();

    let descriptors = [
        SymbolDescriptor {
            name: "Adam",
            signature: "Adam(learning_rate, beta1, beta2, eps)",
            doc: "Adam optimizer specification",
            category: "optimizer",
            factory: adam,
        },
        SymbolDescriptor {
            name: "ActorNetwork",
            signature: "ActorNetwork(fc_layers, activation)",
            doc: "policy network specification",
            category: "network",
            factory: network,
        },
        SymbolDescriptor {
            name: "ValueNetwork",
            signature: "ValueNetwork(fc_layers, activation)",
            doc: "value network specification",
            category: "network",
            factory: network,
        },
        SymbolDescriptor {
            name: "NavigationEnv",
            signature: "NavigationEnv(name, num_parallel, max_episode_steps)",
            doc: "simulated navigation environment",
            category: "environment",
            factory: navigation_env,
        },
        SymbolDescriptor {
            name: "ActorCriticAlgorithm",
            signature:
                "ActorCriticAlgorithm(gamma, entropy_regularization, gradient_clipping, ...)",
            doc: "actor-critic update rule",
            category: "algorithm",
            factory: actor_critic,
        },
        SymbolDescriptor {
            name: "Trainer",
            signature: "Trainer(env, algorithm, num_iterations, unroll_length, ...)",
            doc: "training loop",
            category: "trainer",
            factory: trainer,
        },
    ];

    for descriptor in descriptors {
        registry
            .register(descriptor)
            .expect("built-in stack has unique names");
    }
    registry
}
