use rustc_hash::FxHashMap;

use crate::concat_string;

/// Appends `~1`, `~2`, .. to `name` until it no longer clashes with a name handed out before.
pub fn make_unique_name(name: &str, used_name_counts: &mut FxHashMap<String, u32>) -> String {
  let mut candidate = name.to_string();
  loop {
    match used_name_counts.get_mut(&candidate) {
      Some(count) => {
        *count += 1;
        let mut buffer = itoa::Buffer::new();
        candidate = concat_string!(name, "~", buffer.format(*count));
      }
      None => {
        used_name_counts.insert(candidate.clone(), 0);
        return candidate;
      }
    }
  }
}

#[test]
fn test_make_unique_name() {
  let mut used = FxHashMap::default();
  assert_eq!(make_unique_name("main", &mut used), "main");
  assert_eq!(make_unique_name("main", &mut used), "main~1");
  assert_eq!(make_unique_name("main", &mut used), "main~2");
  assert_eq!(make_unique_name("main~1", &mut used), "main~1~1");
}
