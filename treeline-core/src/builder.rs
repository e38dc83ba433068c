//! Builder utilities for configuring spanning-tree construction.
//!
//! Exposes the execution-strategy selection surface, the output-mode switch,
//! and the validation performed before constructing [`Treeline`] instances.

use crate::error::{Result, TreelineError};
use crate::treeline::Treeline;

/// Indicates how [`Treeline`] selects a compute backend when
/// [`Treeline::run`] is invoked.
///
/// `Auto` resolves backends deterministically. Today it maps to the Rayon
/// CPU backend because no GPU implementation ships with the crate. Once a
/// GPU backend lands it will select the GPU when available and fall back to
/// the CPU otherwise so behaviour stays stable across builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Allow the library to select an appropriate backend automatically.
    Auto,
    /// Restrict execution to the CPU implementation.
    CpuOnly,
    /// Prefer a GPU implementation if one is available.
    GpuPreferred,
}

/// Selects what [`Treeline::run`] produces from the shared Borůvka core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// The minimum spanning tree alone.
    Mst,
    /// The spanning tree plus its single-linkage dendrogram.
    Hdbscan,
}

/// Configures and constructs [`Treeline`] instances.
///
/// # Examples
/// ```
/// use treeline_core::{BuildMode, ExecutionStrategy, TreelineBuilder};
///
/// let treeline = TreelineBuilder::new()
///     .with_neighbourhood_size(4)
///     .with_mode(BuildMode::Hdbscan)
///     .with_execution_strategy(ExecutionStrategy::CpuOnly)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(treeline.neighbourhood_size(), 4);
/// assert_eq!(treeline.mode(), BuildMode::Hdbscan);
/// ```
#[derive(Debug, Clone)]
pub struct TreelineBuilder {
    neighbourhood_size: usize,
    mode: BuildMode,
    execution_strategy: ExecutionStrategy,
    shared_radii: bool,
    lower_bounds: bool,
}

impl Default for TreelineBuilder {
    fn default() -> Self {
        Self {
            neighbourhood_size: 1,
            mode: BuildMode::Mst,
            execution_strategy: ExecutionStrategy::Auto,
            shared_radii: true,
            lower_bounds: true,
        }
    }
}

impl TreelineBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use treeline_core::{BuildMode, ExecutionStrategy, TreelineBuilder};
    ///
    /// let builder = TreelineBuilder::new();
    /// assert_eq!(builder.neighbourhood_size(), 1);
    /// assert_eq!(builder.mode(), BuildMode::Mst);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Auto);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the neighbourhood size `k` used for core distances.
    ///
    /// With `k == 1` edge weights are plain Euclidean distances; any larger
    /// value switches the metric to mutual reachability over `k`-nearest
    /// core distances (the point itself counts as its first neighbour).
    #[must_use]
    pub fn with_neighbourhood_size(mut self, size: usize) -> Self {
        self.neighbourhood_size = size;
        self
    }

    /// Returns the configured neighbourhood size.
    #[must_use]
    pub fn neighbourhood_size(&self) -> usize {
        self.neighbourhood_size
    }

    /// Sets the output mode.
    #[must_use]
    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the configured output mode.
    #[must_use]
    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Sets the execution strategy to use when running the algorithm.
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the currently configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Enables or disables the shared per-component search radii.
    ///
    /// Purely a performance toggle; the resulting tree is identical either
    /// way.
    #[must_use]
    pub fn with_shared_radii(mut self, enabled: bool) -> Self {
        self.shared_radii = enabled;
        self
    }

    /// Returns whether shared search radii are enabled.
    #[must_use]
    pub fn shared_radii(&self) -> bool {
        self.shared_radii
    }

    /// Enables or disables the per-leaf lower-bound cache carried across
    /// rounds.
    ///
    /// Purely a performance toggle; the resulting tree is identical either
    /// way.
    #[must_use]
    pub fn with_lower_bounds(mut self, enabled: bool) -> Self {
        self.lower_bounds = enabled;
        self
    }

    /// Returns whether the lower-bound cache is enabled.
    #[must_use]
    pub fn lower_bounds(&self) -> bool {
        self.lower_bounds
    }

    /// Validates the configuration and constructs a [`Treeline`] instance.
    ///
    /// # Errors
    /// Returns [`TreelineError::InvalidNeighbourhoodSize`] when the
    /// neighbourhood size is zero.
    ///
    /// # Examples
    /// ```
    /// use treeline_core::TreelineBuilder;
    ///
    /// let treeline = TreelineBuilder::new().build().expect("configuration is valid");
    /// assert_eq!(treeline.neighbourhood_size(), 1);
    /// ```
    pub fn build(self) -> Result<Treeline> {
        if self.neighbourhood_size == 0 {
            return Err(TreelineError::InvalidNeighbourhoodSize { got: 0 });
        }

        Ok(Treeline::new(
            self.neighbourhood_size,
            self.mode,
            self.execution_strategy,
            self.shared_radii,
            self.lower_bounds,
        ))
    }
}
