//! Lists the built-in experiment components and loads the demo config.
//!
//! Run with: cargo run --example print_registry

use std::path::Path;

// The example lives in the binary crate, so pull the stack in directly.
#[path = "../src/stack.rs"]
mod stack;

fn main() {
    let registry = stack::registry();
    println!("Registered symbols: {}", registry.len());
    for descriptor in registry.descriptors() {
        println!(
            "  @{:<24} {:<12} {}",
            descriptor.name, descriptor.category, descriptor.signature
        );
    }

    let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs/actor_critic.rig");
    match rigging_conf::load_path(&demo, &registry) {
        Ok(store) => {
            println!("\nLoaded {} with {} bindings:\n", demo.display(), store.len());
            print!("{}", rigging_conf::config_str(&store));
        }
        Err(e) => {
            eprintln!("Failed to load demo config:\n{}", e);
            std::process::exit(1);
        }
    }
}
