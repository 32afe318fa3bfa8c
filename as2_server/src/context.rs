//! Directory bootstrap and `EngineContext` construction for the reference binary: built once at
//! startup from concrete types, since `as2_store::MemoryStore` and `as2_store::FileArtifactStore`
//! are the only store/artifact implementations this repo carries.

use crate::cfg::Config;

use as2_core::prelude::*;
use as2_engine::{EngineConfig, EngineContext};
use as2_profile::MemoryProfileStore;
use as2_store::{FileArtifactStore, MemoryStore};

use std::{fs, path::Path, sync::Arc};

/// Create the on-disk layout under `cfg.data_dir` and build the
/// `EngineContext` the HTTP handler and coordinator task share.
pub fn bootstrap(cfg: &Config) -> Outcome<Arc<EngineContext>> {
    let root = Path::new(&cfg.data_dir);
    for sub in [
        "messages/__store/payload/received",
        "messages/__store/payload/sent",
        "messages/__store/mdn/received",
        "messages/__store/mdn/sent",
        "messages/__store/raw/received",
    ] {
        res!(fs::create_dir_all(root.join(sub)), IO, File, Write);
    }

    let engine_cfg = EngineConfig {
        as2_version:    "1.1".to_string(),
        receive_url:    cfg.receive_url(),
        mdn_url:        cfg.mdn_url.clone(),
        async_mdn_wait: cfg.async_mdn_wait,
        max_retries:    cfg.max_retries,
        user_agent:     "as2rs".to_string(),
        local_host:     cfg.host.clone(),
    };

    info!("Data directory: {:?}", root);
    info!("Receive endpoint: {}", engine_cfg.receive_url);

    Ok(Arc::new(EngineContext::new(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryProfileStore::new()),
        Arc::new(FileArtifactStore::new(root)),
        engine_cfg,
    )))
}
