use crate::pretty_type_name::pretty_type_name;

pub trait OptionExt<T> {
  fn unpack(self) -> T;

  fn unpack_ref(&self) -> &T;
}

impl<T> OptionExt<T> for Option<T> {
  /// Similar to `unwrap`, but with a more descriptive panic message.
  ///
  /// ```ignore
  /// None::<usize>.unpack();
  /// // Got `None` value when calling `OptionExt::unpack()` on `Option<usize>`
  /// ```
  fn unpack(self) -> T {
    self.unwrap_or_else(|| {
      panic!("Got `None` value when calling `OptionExt::unpack()` on `{}`", pretty_type_name::<Self>())
    })
  }

  /// Shorthand for `self.as_ref().unpack()`.
  fn unpack_ref(&self) -> &T {
    self.as_ref().unpack()
  }
}
