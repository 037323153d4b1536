pub mod java;

pub use java::{
    JavaScanner, ResolvedRuntime, RuntimeCandidate, RuntimeEnumerator, RuntimeSelector,
    RuntimeSource, RuntimeSources, RuntimeVersion,
};
