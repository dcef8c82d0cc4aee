//! # Mod Loader
//!
//! Holds the registered mods and drives their entrypoints.
//!
//! ## Stages
//!
//! ```text
//! Registering ──api_init()──> CommonReady ──side_init()──> Ready
//!   register()     │                          │
//!                  └──── entrypoint error ────┴──> Failed
//! ```
//!
//! `api_init` first resolves dependencies (see [`crate::resolve`]) and
//! reorders the mods so requirements initialize first. A resolution error
//! leaves the loader in `Registering`, since no entrypoint has run yet.
//!
//! The first failing entrypoint stops the stage and is returned as
//! [`ApiError::Entrypoint`]. The loader then detaches every subscription
//! the mods tracked and moves to `Failed`, which rejects further stages.

use std::fmt;
use std::sync::Arc;

use felis_events::{JointContext, Subscription};
use semver::{Version, VersionReq};

use crate::config::FelisConfig;
use crate::entrypoint::{
    ClientEntrypoint, CommonEntrypoint, EntrypointKind, EntrypointResult, InitContext,
    ServerEntrypoint,
};
use crate::error::{ApiError, ApiResult};
use crate::events::EventCatalog;
use crate::hooks::GameHooks;
use crate::meta::ModMetadata;
use crate::resolve::resolve;
use crate::side::Side;

/// A mod and its entrypoints.
pub struct ModContainer {
    metadata: ModMetadata,
    common: Vec<Box<dyn CommonEntrypoint>>,
    client: Vec<Box<dyn ClientEntrypoint>>,
    server: Vec<Box<dyn ServerEntrypoint>>,
    subscriptions: Vec<Subscription>,
}

impl ModContainer {
    /// Creates a container. Name defaults to the id, version to `0.0.0`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::from_metadata(ModMetadata::new(id.clone(), id, Version::new(0, 0, 0)))
    }

    /// Creates a container from a parsed metadata document.
    #[must_use]
    pub const fn from_metadata(metadata: ModMetadata) -> Self {
        Self {
            metadata,
            common: Vec::new(),
            client: Vec::new(),
            server: Vec::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.metadata.name = name.into();
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.metadata.version = version;
        self
    }

    /// Adds a required mod.
    #[must_use]
    pub fn requires(mut self, modid: impl Into<String>, version: VersionReq) -> Self {
        self.metadata = self.metadata.requires(modid, version);
        self
    }

    /// Adds an incompatible mod.
    #[must_use]
    pub fn breaks(mut self, modid: impl Into<String>, version: VersionReq) -> Self {
        self.metadata = self.metadata.breaks(modid, version);
        self
    }

    /// Adds a common entrypoint.
    #[must_use]
    pub fn with_common(mut self, entrypoint: impl CommonEntrypoint + 'static) -> Self {
        self.common.push(Box::new(entrypoint));
        self
    }

    /// Adds a client entrypoint.
    #[must_use]
    pub fn with_client(mut self, entrypoint: impl ClientEntrypoint + 'static) -> Self {
        self.client.push(Box::new(entrypoint));
        self
    }

    /// Adds a server entrypoint.
    #[must_use]
    pub fn with_server(mut self, entrypoint: impl ServerEntrypoint + 'static) -> Self {
        self.server.push(Box::new(entrypoint));
        self
    }

    /// Mod id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.metadata.modid
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Mod version.
    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.metadata.version
    }

    /// Full metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ModMetadata {
        &self.metadata
    }

    /// Subscriptions the mod's entrypoints tracked so far.
    #[must_use]
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    fn run(&mut self, kind: EntrypointKind, side: Side, events: &EventCatalog) -> ApiResult<()> {
        let mut ctx = InitContext::new(&self.metadata.modid, side, events);
        let result = match kind {
            EntrypointKind::Common => run_all(self.common.as_slice(), |e| e.on_init(&mut ctx)),
            EntrypointKind::Client => {
                run_all(self.client.as_slice(), |e| e.on_client_init(&mut ctx))
            }
            EntrypointKind::Server => {
                run_all(self.server.as_slice(), |e| e.on_server_init(&mut ctx))
            }
        };
        let tracked = ctx.into_tracked();
        self.subscriptions.extend(tracked);

        result.map_err(|err| ApiError::Entrypoint {
            mod_id: self.metadata.modid.clone(),
            entrypoint: kind,
            reason: err.to_string(),
        })
    }
}

fn run_all<E: ?Sized>(
    entrypoints: &[Box<E>],
    mut call: impl FnMut(&E) -> EntrypointResult,
) -> EntrypointResult {
    entrypoints.iter().try_for_each(|entrypoint| call(&**entrypoint))
}

impl fmt::Debug for ModContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModContainer")
            .field("id", &self.metadata.modid)
            .field("version", &self.metadata.version)
            .field("common", &self.common.len())
            .field("client", &self.client.len())
            .field("server", &self.server.len())
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

/// Loader stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoaderStage {
    /// Accepting mods.
    Registering,
    /// Common entrypoints have run.
    CommonReady,
    /// Side entrypoints have run.
    Ready,
    /// An entrypoint failed; every tracked subscription was detached.
    Failed,
}

/// Drives mod initialization.
pub struct ModLoader {
    config: FelisConfig,
    events: Arc<EventCatalog>,
    mods: Vec<ModContainer>,
    skipped: Vec<String>,
    stage: LoaderStage,
}

impl ModLoader {
    /// Creates a loader firing into `events`.
    #[must_use]
    pub const fn new(config: FelisConfig, events: Arc<EventCatalog>) -> Self {
        Self {
            config,
            events,
            mods: Vec::new(),
            skipped: Vec::new(),
            stage: LoaderStage::Registering,
        }
    }

    /// Adds a mod. Mods listed in `[mods] disabled` are skipped, but their
    /// ids still count as taken.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Stage`] after [`api_init`](Self::api_init).
    /// - [`ApiError::InvalidModId`] or [`ApiError::UnsupportedSchema`] for
    ///   invalid metadata.
    /// - [`ApiError::DuplicateMod`] if the id is taken, disabled or not.
    pub fn register(&mut self, container: ModContainer) -> ApiResult<()> {
        if self.stage != LoaderStage::Registering {
            return Err(ApiError::Stage("mods must be registered before api_init"));
        }
        container.metadata.validate()?;

        let id = container.id();
        if self.mods.iter().any(|m| m.id() == id) || self.skipped.iter().any(|s| s == id) {
            return Err(ApiError::DuplicateMod(id.to_string()));
        }
        if self.config.is_disabled(id) {
            tracing::info!(mod_id = %id, "mod disabled by configuration, skipping");
            self.skipped.push(id.to_string());
            return Ok(());
        }

        tracing::debug!(mod_id = %id, version = %container.version(), "mod registered");
        self.mods.push(container);
        Ok(())
    }

    /// Resolves dependencies, runs every common entrypoint, then fires
    /// `Loader.entrypointLoaded` with key `common`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Stage`] unless the loader is still registering.
    /// - Resolution errors ([`ApiError::MissingDependency`],
    ///   [`ApiError::VersionMismatch`], [`ApiError::Breaks`],
    ///   [`ApiError::SelfDependency`], [`ApiError::CircularDependency`]).
    /// - [`ApiError::Entrypoint`] on the first failing entrypoint.
    pub fn api_init(&mut self) -> ApiResult<()> {
        match self.stage {
            LoaderStage::Registering => {}
            LoaderStage::Failed => return Err(ApiError::Stage("loader failed in an earlier stage")),
            LoaderStage::CommonReady | LoaderStage::Ready => {
                return Err(ApiError::Stage("api_init already ran"))
            }
        }

        let metadata: Vec<&ModMetadata> = self.mods.iter().map(ModContainer::metadata).collect();
        let order = resolve(&metadata)?;
        let mut slots: Vec<Option<ModContainer>> =
            std::mem::take(&mut self.mods).into_iter().map(Some).collect();
        self.mods = order.into_iter().filter_map(|i| slots[i].take()).collect();

        self.run_stage(EntrypointKind::Common)?;
        self.stage = LoaderStage::CommonReady;
        Ok(())
    }

    /// Runs the entrypoints of the configured side, then fires
    /// `Loader.entrypointLoaded` with the side's key.
    ///
    /// # Errors
    ///
    /// [`ApiError::Stage`] unless called once after a successful
    /// [`api_init`](Self::api_init), [`ApiError::Entrypoint`] on the first
    /// failing entrypoint.
    pub fn side_init(&mut self) -> ApiResult<()> {
        match self.stage {
            LoaderStage::Registering => return Err(ApiError::Stage("side_init before api_init")),
            LoaderStage::Ready => return Err(ApiError::Stage("side_init already ran")),
            LoaderStage::Failed => return Err(ApiError::Stage("loader failed in an earlier stage")),
            LoaderStage::CommonReady => {}
        }
        self.run_stage(self.config.side.entrypoint())?;
        self.stage = LoaderStage::Ready;
        Ok(())
    }

    fn run_stage(&mut self, kind: EntrypointKind) -> ApiResult<()> {
        tracing::info!(entrypoint = %kind, mods = self.mods.len(), "running entrypoints");
        let side = self.config.side;
        let outcome = self
            .mods
            .iter_mut()
            .try_for_each(|container| container.run(kind, side, &self.events));
        if let Err(err) = outcome {
            self.fail();
            return Err(err);
        }

        let ctx = JointContext::new(kind.key().to_string(), ());
        let report = self.events.loader.entrypoint_loaded.fire(&ctx);
        tracing::info!(
            entrypoint = %kind,
            listeners = report.invoked,
            "entrypoint stage complete"
        );
        Ok(())
    }

    fn fail(&mut self) {
        let registry = self.events.registry();
        let mut detached = 0_usize;
        for container in &mut self.mods {
            for subscription in container.subscriptions.drain(..) {
                if registry.unsubscribe(&subscription) {
                    detached += 1;
                }
            }
        }
        self.stage = LoaderStage::Failed;
        tracing::error!(detached, "entrypoint failed, mod subscriptions detached");
    }

    /// Ids of the loaded mods: registration order before
    /// [`api_init`](Self::api_init), initialization order after.
    pub fn mod_ids(&self) -> impl Iterator<Item = &str> {
        self.mods.iter().map(ModContainer::id)
    }

    /// Loaded mod by id.
    #[must_use]
    pub fn get(&self, mod_id: &str) -> Option<&ModContainer> {
        self.mods.iter().find(|m| m.id() == mod_id)
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> LoaderStage {
        self.stage
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &FelisConfig {
        &self.config
    }

    /// The event catalog.
    #[must_use]
    pub const fn events(&self) -> &Arc<EventCatalog> {
        &self.events
    }

    /// Hooks for the host, honoring `trace_dispatch`.
    #[must_use]
    pub fn hooks(&self) -> GameHooks {
        GameHooks::new(Arc::clone(&self.events)).with_trace_dispatch(self.config.trace_dispatch)
    }
}

impl fmt::Debug for ModLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModLoader")
            .field("side", &self.config.side)
            .field("stage", &self.stage)
            .field("mods", &self.mods)
            .field("skipped", &self.skipped)
            .finish_non_exhaustive()
    }
}
