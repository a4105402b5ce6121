use std::borrow::Cow;

use rollpack_common::{ImportKind, ModuleType, RenderedChunk};
use rollpack_error::BuildDiagnostic;
use tokio::sync::{mpsc, oneshot};

use crate::{
  plugin::{
    HookLoadReturn, HookNoopReturn, HookRenderChunkReturn, HookResolveIdReturn, HookResult,
    HookTransformReturn,
  },
  types::{
    hook_build_end_args::HookBuildEndArgs, hook_load::HookLoadArgs,
    hook_render_chunk::HookRenderChunkArgs, hook_resolve_id::HookResolveIdArgs,
    hook_transform::HookTransformArgs, hook_usage::HookUsage,
  },
  Plugin, PluginContext, TransformPluginContext,
};

/// A hook invocation waiting for the host. The host answers through `reply` and reaches back
/// into the build (emitting assets, resolving, logging) through `ctx`.
#[derive(Debug)]
pub enum HostCall {
  BuildStart {
    ctx: PluginContext,
    reply: oneshot::Sender<HookNoopReturn>,
  },
  ResolveId {
    ctx: PluginContext,
    specifier: String,
    importer: Option<String>,
    kind: ImportKind,
    is_entry: bool,
    reply: oneshot::Sender<HookResolveIdReturn>,
  },
  Load {
    ctx: PluginContext,
    id: String,
    reply: oneshot::Sender<HookLoadReturn>,
  },
  Transform {
    /// Assets emitted through it are replayed when the transform result comes from the cache.
    ctx: TransformPluginContext,
    id: String,
    code: String,
    module_type: ModuleType,
    reply: oneshot::Sender<HookTransformReturn>,
  },
  RenderChunk {
    ctx: PluginContext,
    code: String,
    chunk: Box<RenderedChunk>,
    reply: oneshot::Sender<HookRenderChunkReturn>,
  },
  BuildEnd {
    ctx: PluginContext,
    errors: Option<Vec<BuildDiagnostic>>,
    reply: oneshot::Sender<HookNoopReturn>,
  },
}

impl HostCall {
  pub fn ctx(&self) -> &PluginContext {
    match self {
      Self::BuildStart { ctx, .. }
      | Self::ResolveId { ctx, .. }
      | Self::Load { ctx, .. }
      | Self::RenderChunk { ctx, .. }
      | Self::BuildEnd { ctx, .. } => ctx,
      Self::Transform { ctx, .. } => ctx,
    }
  }
}

/// Forwards its hooks to a host over a channel. Each call carries its own reply channel, so the
/// module task that made it suspends while other tasks keep running.
#[derive(Debug)]
pub struct BridgePlugin {
  name: Cow<'static, str>,
  hook_usage: HookUsage,
  sender: mpsc::Sender<HostCall>,
}

impl BridgePlugin {
  pub const SUPPORTED_HOOKS: HookUsage = HookUsage::BUILD_START
    .union(HookUsage::RESOLVE_ID)
    .union(HookUsage::LOAD)
    .union(HookUsage::TRANSFORM)
    .union(HookUsage::RENDER_CHUNK)
    .union(HookUsage::BUILD_END);

  /// `hook_usage` outside [`Self::SUPPORTED_HOOKS`] is ignored.
  pub fn new(
    name: impl Into<Cow<'static, str>>,
    hook_usage: HookUsage,
    buffer: usize,
  ) -> (Self, mpsc::Receiver<HostCall>) {
    let (sender, receiver) = mpsc::channel(buffer.max(1));
    let plugin = Self {
      name: name.into(),
      hook_usage: hook_usage.intersection(Self::SUPPORTED_HOOKS),
      sender,
    };
    (plugin, receiver)
  }

  async fn call<T: Send>(
    &self,
    make_call: impl FnOnce(oneshot::Sender<HookResult<T>>) -> HostCall + Send,
  ) -> HookResult<T> {
    let (reply, response) = oneshot::channel();
    self
      .sender
      .send(make_call(reply))
      .await
      .map_err(|_| anyhow::anyhow!("The host of plugin {:?} stopped receiving calls", self.name))?;
    response
      .await
      .map_err(|_| anyhow::anyhow!("The host of plugin {:?} dropped a call", self.name))?
  }
}

impl Plugin for BridgePlugin {
  fn name(&self) -> Cow<'static, str> {
    self.name.clone()
  }

  async fn build_start(&self, ctx: &PluginContext) -> HookNoopReturn {
    let ctx = ctx.clone();
    self.call(|reply| HostCall::BuildStart { ctx, reply }).await
  }

  async fn resolve_id(
    &self,
    ctx: &PluginContext,
    args: &HookResolveIdArgs<'_>,
  ) -> HookResolveIdReturn {
    let ctx = ctx.clone();
    let specifier = args.specifier.to_string();
    let importer = args.importer.map(ToString::to_string);
    let (kind, is_entry) = (args.kind, args.is_entry);
    self.call(|reply| HostCall::ResolveId { ctx, specifier, importer, kind, is_entry, reply }).await
  }

  async fn load(&self, ctx: &PluginContext, args: &HookLoadArgs<'_>) -> HookLoadReturn {
    let ctx = ctx.clone();
    let id = args.id.to_string();
    self.call(|reply| HostCall::Load { ctx, id, reply }).await
  }

  async fn transform(
    &self,
    ctx: &TransformPluginContext,
    args: &HookTransformArgs<'_>,
  ) -> HookTransformReturn {
    let ctx = ctx.clone();
    let id = args.id.to_string();
    let code = args.code.to_string();
    let module_type = *args.module_type;
    self.call(|reply| HostCall::Transform { ctx, id, code, module_type, reply }).await
  }

  async fn build_end(
    &self,
    ctx: &PluginContext,
    args: Option<&HookBuildEndArgs<'_>>,
  ) -> HookNoopReturn {
    let ctx = ctx.clone();
    let errors = args.map(|args| args.errors.to_vec());
    self.call(|reply| HostCall::BuildEnd { ctx, errors, reply }).await
  }

  async fn render_chunk(
    &self,
    ctx: &PluginContext,
    args: &HookRenderChunkArgs<'_>,
  ) -> HookRenderChunkReturn {
    let ctx = ctx.clone();
    let code = args.code.to_string();
    let chunk = Box::new(args.chunk.clone());
    self.call(|reply| HostCall::RenderChunk { ctx, code, chunk, reply }).await
  }

  fn register_hook_usage(&self) -> HookUsage {
    self.hook_usage
  }
}
