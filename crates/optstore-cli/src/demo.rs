//! The definition the CLI works on.

use optstore_core::{key_set, KeyFactory};
use optstore_definition::{
    DefinitionResult, GenericStoreDefinition, StoreDefinitionBuilder, StoreDefinitions,
};

key_set! {
    /// Process-level options.
    pub struct Runtime {
        /// Number of worker threads.
        pub THREADS: i32 = KeyFactory::integer_with("threads", 4).with_label("Worker threads");
        /// Print progress while running.
        pub VERBOSE: bool = KeyFactory::bool("verbose").with_label("Print progress");
    }
}

key_set! {
    /// Report options.
    pub struct Report {
        /// Output file.
        pub OUTPUT: String = KeyFactory::string_with("output", "report.txt").with_label("Output file");
        /// Formats to emit.
        pub FORMATS: Vec<String> =
            KeyFactory::string_list_with("formats", vec!["text".to_string()]).with_label("Report formats");
        /// Numeric tolerance.
        pub PRECISION: f64 = KeyFactory::double_with("precision", 0.001);
    }
}

/// Name of the demo definition.
pub const DEFINITION_NAME: &str = "Demo";

/// Builds the demo definition: a profile key, then one section per key set.
pub fn definition() -> DefinitionResult<GenericStoreDefinition> {
    let runtime = StoreDefinitions::from_key_set::<Runtime>()?;
    let report = StoreDefinitions::from_key_set::<Report>()?;

    StoreDefinitionBuilder::new(DEFINITION_NAME)
        .add_key(KeyFactory::string("profile").with_label("Profile name"))
        .add_named_definition(&*runtime)
        .add_named_definition(&*report)
        .build()
}
