use rollpack_common::{
  BundlerOptions, ExternalMatcher, FilenameTemplate, NormalizedBundlerOptions,
  NormalizedManualChunk, OutputFormat, Platform, ResolveOptions,
};
use rollpack_error::BuildDiagnostic;

pub struct NormalizeOptionsReturn {
  pub options: NormalizedBundlerOptions,
  pub resolve_options: ResolveOptions,
}

pub fn normalize_options(
  mut raw_options: BundlerOptions,
) -> Result<NormalizeOptionsReturn, BuildDiagnostic> {
  let input = raw_options.input.take().unwrap_or_default();
  if input.is_empty() {
    return Err(BuildDiagnostic::invalid_option("You must supply at least one `input` entry"));
  }
  if let Some(item) = input.iter().find(|item| item.import.is_empty()) {
    return Err(BuildDiagnostic::invalid_option(format!(
      "Input {:?} has an empty import specifier",
      item.name.as_deref().unwrap_or_default()
    )));
  }

  let format = raw_options.format.unwrap_or_default();
  let platform = raw_options.platform.unwrap_or(match format {
    OutputFormat::Cjs => Platform::Node,
    OutputFormat::Esm => Platform::Browser,
  });

  let current_dir = || {
    std::env::current_dir().map_err(|err| {
      BuildDiagnostic::invalid_option(format!("Failed to get the current directory: {err}"))
    })
  };
  let cwd = match raw_options.cwd.take() {
    Some(cwd) if cwd.is_absolute() => cwd,
    Some(cwd) => current_dir()?.join(cwd),
    None => current_dir()?,
  };

  let external = raw_options
    .external
    .take()
    .unwrap_or_default()
    .iter()
    .map(|pattern| {
      ExternalMatcher::parse(pattern).map_err(|err| {
        BuildDiagnostic::invalid_option(format!("Invalid `external` pattern {pattern:?}: {err}"))
      })
    })
    .collect::<Result<Vec<_>, _>>()?;

  let manual_chunks = raw_options
    .manual_chunks
    .take()
    .unwrap_or_default()
    .into_iter()
    .map(|chunk| {
      if chunk.name.is_empty() {
        return Err(BuildDiagnostic::invalid_option("Manual chunks must have a name"));
      }
      let test = regex::Regex::new(&chunk.test).map_err(|err| {
        BuildDiagnostic::invalid_option(format!(
          "Invalid `test` of manual chunk {:?}: {err}",
          chunk.name
        ))
      })?;
      Ok(NormalizedManualChunk { name: chunk.name, test })
    })
    .collect::<Result<Vec<_>, _>>()?;

  let normalized = NormalizedBundlerOptions {
    input,
    cwd,
    platform,
    external,
    treeshake: raw_options.treeshake.unwrap_or_default(),
    dynamic_import_fallback: raw_options.dynamic_import_fallback.unwrap_or_default(),
    shared_chunks: raw_options.shared_chunks.unwrap_or_default(),
    manual_chunks,
    cache: raw_options.cache.unwrap_or(false),
    log_level: raw_options.log_level.unwrap_or_default(),
    dir: raw_options.dir.take().unwrap_or_else(|| "dist".to_string()),
    format,
    entry_filenames: filename_template(
      raw_options.entry_filenames.take(),
      "[name].js",
      "entryFilenames",
    )?,
    chunk_filenames: filename_template(
      raw_options.chunk_filenames.take(),
      "[name]-[hash].js",
      "chunkFilenames",
    )?,
    asset_filenames: filename_template(
      raw_options.asset_filenames.take(),
      "assets/[name]-[hash][extname]",
      "assetFilenames",
    )?,
    sourcemap: raw_options.sourcemap,
    banner: raw_options.banner.take(),
    footer: raw_options.footer.take(),
  };

  Ok(NormalizeOptionsReturn {
    options: normalized,
    resolve_options: raw_options.resolve.take().unwrap_or_default(),
  })
}

fn filename_template(
  value: Option<String>,
  default: &str,
  option_name: &str,
) -> Result<FilenameTemplate, BuildDiagnostic> {
  let template = FilenameTemplate::new(value.unwrap_or_else(|| default.to_string()));
  template.validate().map_err(|reason| {
    BuildDiagnostic::invalid_option(format!("Invalid `{option_name}`: {reason}"))
  })?;
  Ok(template)
}

#[cfg(test)]
mod tests {
  use rollpack_common::{InputItem, ManualChunk};

  use super::*;

  fn with_input() -> BundlerOptions {
    BundlerOptions {
      input: Some(vec![InputItem::from("./main.js")]),
      cwd: Some("/project".into()),
      ..BundlerOptions::default()
    }
  }

  #[test]
  fn fills_in_defaults() {
    let NormalizeOptionsReturn { options, .. } = normalize_options(with_input()).unwrap();
    assert_eq!(options.dir, "dist");
    assert_eq!(options.entry_filenames.template(), "[name].js");
    assert_eq!(options.chunk_filenames.template(), "[name]-[hash].js");
    assert_eq!(options.platform, Platform::Browser);
    assert!(options.treeshake.enabled);
    assert!(!options.cache);
  }

  #[test]
  fn cjs_defaults_to_node() {
    let options =
      normalize_options(BundlerOptions { format: Some(OutputFormat::Cjs), ..with_input() })
        .unwrap()
        .options;
    assert_eq!(options.platform, Platform::Node);
  }

  #[test]
  fn rejects_invalid_options() {
    let empty = normalize_options(BundlerOptions::default()).err().unwrap();
    assert_eq!(empty.code(), "INVALID_OPTION");

    let bad_regex = normalize_options(BundlerOptions {
      manual_chunks: Some(vec![ManualChunk { name: "vendor".into(), test: "(".into() }]),
      ..with_input()
    })
    .err()
    .unwrap();
    assert_eq!(bad_regex.code(), "INVALID_OPTION");
    assert!(bad_regex.message().contains("vendor"));

    let bad_template = normalize_options(BundlerOptions {
      chunk_filenames: Some("[name]-[hash:99].js".into()),
      ..with_input()
    })
    .err()
    .unwrap();
    assert!(bad_template.message().contains("chunkFilenames"));
  }
}
