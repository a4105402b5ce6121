use bitflags::bitflags;

bitflags! {
  /// The hooks a plugin implements. The driver skips a plugin for every hook outside this set.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
  pub struct HookUsage: u32 {
    const BUILD_START            = 1 << 0;
    const RESOLVE_ID             = 1 << 1;
    const RESOLVE_DYNAMIC_IMPORT = 1 << 2;
    const LOAD                   = 1 << 3;
    const TRANSFORM              = 1 << 4;
    const MODULE_PARSED          = 1 << 5;
    const BUILD_END              = 1 << 6;
    const RENDER_START           = 1 << 7;
    const RENDER_CHUNK           = 1 << 8;
    const AUGMENT_CHUNK_HASH     = 1 << 9;
    const GENERATE_BUNDLE        = 1 << 10;
    const WRITE_BUNDLE           = 1 << 11;
  }
}

const HOOK_NAMES: [(HookUsage, &str); 12] = [
  (HookUsage::BUILD_START, "build_start"),
  (HookUsage::RESOLVE_ID, "resolve_id"),
  (HookUsage::RESOLVE_DYNAMIC_IMPORT, "resolve_dynamic_import"),
  (HookUsage::LOAD, "load"),
  (HookUsage::TRANSFORM, "transform"),
  (HookUsage::MODULE_PARSED, "module_parsed"),
  (HookUsage::BUILD_END, "build_end"),
  (HookUsage::RENDER_START, "render_start"),
  (HookUsage::RENDER_CHUNK, "render_chunk"),
  (HookUsage::AUGMENT_CHUNK_HASH, "augment_chunk_hash"),
  (HookUsage::GENERATE_BUNDLE, "generate_bundle"),
  (HookUsage::WRITE_BUNDLE, "write_bundle"),
];

impl HookUsage {
  /// Name of a single hook, as reported in diagnostics.
  pub fn hook_name(self) -> &'static str {
    HOOK_NAMES.iter().find(|(hook, _)| *hook == self).map_or("unknown", |(_, name)| *name)
  }
}

#[test]
fn test_hook_name() {
  assert_eq!(HookUsage::TRANSFORM.hook_name(), "transform");
  assert_eq!((HookUsage::LOAD | HookUsage::TRANSFORM).hook_name(), "unknown");
  assert!(HookUsage::all().contains(HookUsage::WRITE_BUNDLE));
}
