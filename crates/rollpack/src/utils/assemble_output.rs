use arcstr::ArcStr;
use rollpack_common::Output;
use rollpack_error::{BuildDiagnostic, BuildResult};
use rollpack_plugin::PluginDriver;
use rustc_hash::{FxHashMap, FxHashSet};

/// Builds the Output Set: chunks in chunk order, then every asset sorted by file name. Runs
/// `generate_bundle` and picks up the assets it emitted before checking that file names are
/// unique.
pub async fn assemble_output(
  plugin_driver: &PluginDriver,
  rendered: Vec<Output>,
  is_write: bool,
) -> BuildResult<Vec<Output>> {
  let file_emitter = plugin_driver.file_emitter();
  let (mut outputs, mut assets): (Vec<_>, Vec<_>) =
    rendered.into_iter().partition(|output| matches!(output, Output::Chunk(_)));
  assets.extend(file_emitter.assets().into_iter().map(|asset| Output::Asset(Box::new(asset))));
  assets.sort_by(|a, b| a.file_name().cmp(b.file_name()));
  outputs.extend(assets);

  let emitted_before = file_emitter.reference_ids().into_iter().collect::<FxHashSet<_>>();
  plugin_driver.generate_bundle(&mut outputs, is_write).await?;

  let mut emitted_late = file_emitter
    .reference_ids()
    .into_iter()
    .filter(|reference_id| !emitted_before.contains(reference_id))
    .filter_map(|reference_id| file_emitter.asset(&reference_id))
    .collect::<Vec<_>>();
  emitted_late.sort_by(|a, b| a.file_name.cmp(&b.file_name));
  outputs.extend(emitted_late.into_iter().map(|asset| Output::Asset(Box::new(asset))));

  dedupe_and_validate_file_names(&mut outputs)?;
  Ok(outputs)
}

/// An asset written twice with the same bytes is kept once, any other clash is fatal.
fn dedupe_and_validate_file_names(outputs: &mut Vec<Output>) -> Result<(), BuildDiagnostic> {
  let mut seen: FxHashMap<ArcStr, usize> = FxHashMap::default();
  let mut duplicates = vec![];
  for (idx, output) in outputs.iter().enumerate() {
    let Some(&first) = seen.get(output.file_name()) else {
      seen.insert(output.file_name().clone(), idx);
      continue;
    };
    let first_output = &outputs[first];
    if is_same_asset(first_output, output) {
      duplicates.push(idx);
      continue;
    }
    return Err(BuildDiagnostic::file_name_conflict(
      output.file_name(),
      &describe(first_output),
      &describe(output),
    ));
  }
  for idx in duplicates.into_iter().rev() {
    outputs.remove(idx);
  }
  Ok(())
}

fn is_same_asset(a: &Output, b: &Output) -> bool {
  match (a, b) {
    (Output::Asset(a), Output::Asset(b)) => a.source == b.source,
    _ => false,
  }
}

fn describe(output: &Output) -> String {
  match output {
    Output::Chunk(chunk) => format!("chunk {}", chunk.name),
    Output::Asset(asset) => match &asset.name {
      Some(name) => format!("asset {name}"),
      None => format!("asset {}", asset.file_name),
    },
  }
}

#[cfg(test)]
mod tests {
  use rollpack_common::{AssetSource, OutputAsset, OutputChunk};

  use super::*;

  fn asset(file_name: &str, name: Option<&str>, source: &str) -> Output {
    Output::Asset(Box::new(OutputAsset {
      name: name.map(ToString::to_string),
      file_name: file_name.into(),
      source: AssetSource::String(source.to_string()),
    }))
  }

  fn chunk(file_name: &str, name: &str) -> Output {
    Output::Chunk(Box::new(OutputChunk {
      name: name.into(),
      is_entry: true,
      is_dynamic_entry: false,
      facade_module_id: None,
      module_ids: vec![],
      exports: vec![],
      file_name: file_name.into(),
      modules: rollpack_common::Modules::default(),
      imports: vec![],
      dynamic_imports: vec![],
      code: String::new(),
      map: None,
      sourcemap_file_name: None,
      preliminary_file_name: file_name.to_string(),
    }))
  }

  #[test]
  fn identical_assets_are_kept_once() {
    let mut outputs = vec![asset("a.txt", None, "a"), asset("a.txt", Some("a.txt"), "a")];
    dedupe_and_validate_file_names(&mut outputs).unwrap();
    assert_eq!(outputs.len(), 1);
  }

  #[test]
  fn clashes_name_both_outputs() {
    let mut outputs = vec![chunk("main.js", "main"), asset("main.js", Some("copied"), "x")];
    let err = dedupe_and_validate_file_names(&mut outputs).unwrap_err();
    assert_eq!(err.code(), "FILE_NAME_CONFLICT");
    assert!(err.message().contains("chunk main"));
    assert!(err.message().contains("asset copied"));
  }

  #[test]
  fn unnamed_assets_are_described_by_file_name() {
    let mut outputs = vec![asset("logo.svg", None, "a"), asset("logo.svg", None, "b")];
    let err = dedupe_and_validate_file_names(&mut outputs).unwrap_err();
    assert!(err.message().contains("asset logo.svg"));
  }
}
