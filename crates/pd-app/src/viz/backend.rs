//! Visualization back-ends, one per host capability.

use std::collections::HashSet;

use pd_model::Model;
use pd_results::MountedResult;
use serde_json::json;
use tracing::debug;

use super::channel::{ACTION_BAKE_GEOMETRY, ACTION_BAKE_MODEL, HostChannel, HostMessage};
use super::host::Host;
use super::viewer::{SceneFile, ViewerSink};
use crate::error::{AppError, AppResult};

/// Labels and keys for the model preview/bake pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelViewOptions {
    pub label: String,
    pub key: String,
    pub layer: String,
}

impl Default for ModelViewOptions {
    fn default() -> Self {
        Self {
            label: "Preview model".to_string(),
            key: "model".to_string(),
            layer: "hbjson".to_string(),
        }
    }
}

pub trait VizBackend {
    fn name(&self) -> &'static str;

    /// Whether mesh payloads are consumed. Callers skip aggregation otherwise.
    fn accepts_meshes(&self) -> bool;

    fn show_model(&mut self, model: &Model, options: &ModelViewOptions) -> AppResult<()>;

    fn show_results(&mut self, result: &MountedResult) -> AppResult<()>;

    fn show_scene(&mut self, scene: &SceneFile) -> AppResult<()>;
}

/// Sends previews and bake actions to a CAD host plugin.
///
/// Model messages keep the plain `model` keys the plugin expects; result
/// messages live under `result-` so a set named `model` cannot shadow them.
/// A key or unique id is never sent twice.
pub struct HostPluginBackend<C: HostChannel> {
    channel: C,
    keys: HashSet<String>,
    unique_ids: HashSet<String>,
}

impl<C: HostChannel> HostPluginBackend<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            keys: HashSet::new(),
            unique_ids: HashSet::new(),
        }
    }

    /// Send a preview/bake pair, refusing it whole if a key or unique id was
    /// already used in this session.
    fn send_pair(&mut self, preview: HostMessage, bake: HostMessage) -> AppResult<()> {
        if let Some(key) = clash(&self.keys, preview.key(), bake.key()) {
            return Err(AppError::Viz(format!("host key '{}' is already in use", key)));
        }
        if let Some(id) = clash(&self.unique_ids, preview.unique_id(), bake.unique_id()) {
            return Err(AppError::Viz(format!("host unique id '{}' is already in use", id)));
        }

        self.channel.send(&preview)?;
        self.channel.send(&bake)?;
        for message in [&preview, &bake] {
            self.keys.insert(message.key().to_string());
            self.unique_ids.insert(message.unique_id().to_string());
        }
        Ok(())
    }
}

fn clash<'a>(used: &HashSet<String>, a: &'a str, b: &'a str) -> Option<&'a str> {
    [a, b]
        .into_iter()
        .find(|id| used.contains(*id))
        .or((a == b).then_some(a))
}

impl<C: HostChannel> VizBackend for HostPluginBackend<C> {
    fn name(&self) -> &'static str {
        "host-plugin"
    }

    fn accepts_meshes(&self) -> bool {
        true
    }

    fn show_model(&mut self, model: &Model, options: &ModelViewOptions) -> AppResult<()> {
        let data = model.to_value()?;
        let units = model.units.clone().unwrap_or_else(|| "Meters".to_string());

        let preview = HostMessage::Preview {
            unique_id: "preview-model".to_string(),
            data: data.clone(),
            default_checked: true,
            is_pollination_model: true,
            label: options.label.clone(),
            key: options.key.clone(),
            delay_ms: None,
        };
        let bake = HostMessage::Bake {
            action: ACTION_BAKE_MODEL.to_string(),
            data,
            unique_id: "bake-model".to_string(),
            options: Some(json!({ "layer": options.layer, "units": units })),
            key: format!("bake-{}", options.key),
        };
        self.send_pair(preview, bake)
    }

    fn show_results(&mut self, result: &MountedResult) -> AppResult<()> {
        let data = serde_json::to_value(result.mesh.clone().into_payload())?;

        let preview = HostMessage::Preview {
            unique_id: format!("preview-result-{}", result.name),
            data: data.clone(),
            default_checked: true,
            is_pollination_model: false,
            label: result.name.clone(),
            key: format!("result-{}", result.name),
            delay_ms: Some(1000),
        };
        let bake = HostMessage::Bake {
            action: ACTION_BAKE_GEOMETRY.to_string(),
            data,
            unique_id: format!("bake-result-{}", result.name),
            options: None,
            key: format!("bake-result-{}", result.name),
        };
        self.send_pair(preview, bake)
    }

    fn show_scene(&mut self, scene: &SceneFile) -> AppResult<()> {
        debug!(key = %scene.key, "host plugin does not render scene files; skipped");
        Ok(())
    }
}

/// Hands scene files to the in-page viewer.
pub struct EmbeddedViewerBackend<S: ViewerSink> {
    sink: S,
}

impl<S: ViewerSink> EmbeddedViewerBackend<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<S: ViewerSink> VizBackend for EmbeddedViewerBackend<S> {
    fn name(&self) -> &'static str {
        "embedded-viewer"
    }

    fn accepts_meshes(&self) -> bool {
        false
    }

    fn show_model(&mut self, model: &Model, _options: &ModelViewOptions) -> AppResult<()> {
        debug!(model = %model.identifier, "not inside a CAD host; model preview skipped");
        Ok(())
    }

    fn show_results(&mut self, result: &MountedResult) -> AppResult<()> {
        debug!(name = %result.name, "not inside a CAD host; mesh preview skipped");
        Ok(())
    }

    fn show_scene(&mut self, scene: &SceneFile) -> AppResult<()> {
        self.sink.render(scene)
    }
}

/// Pick the back-end for `host`. Only the selected side is constructed.
pub fn select_backend<C, S>(
    host: Host,
    channel: impl FnOnce() -> C,
    sink: impl FnOnce() -> S,
) -> Box<dyn VizBackend>
where
    C: HostChannel + 'static,
    S: ViewerSink + 'static,
{
    if host.is_cad_plugin() {
        Box::new(HostPluginBackend::new(channel()))
    } else {
        Box::new(EmbeddedViewerBackend::new(sink()))
    }
}
