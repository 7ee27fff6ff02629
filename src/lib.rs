// THEORY:
// This file is the main entry point for the `chroma_probe` library crate. It answers
// color questions about captured screen frames for automation code that needs to know
// whether a UI element is present and where it is.
//
// The public surface is the `pipeline` module: `ColorProbe` with its `ProbeConfig`,
// plus the data types callers exchange with it (`Frame`, `Region`, `ColorRange`).
// The stateless operations themselves live in `core_modules` and remain reachable for
// callers who prefer free functions with explicit parameters. `parallel_pipeline`
// fans a batch of queries about one frame out over worker threads.

pub mod core_modules;
pub mod parallel_pipeline;
pub mod pipeline;
