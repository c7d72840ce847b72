//! Convert argument builder
//!
//! Turns a [`TransformSpec`] into the positional argument list the convert
//! binary expects: `[input, -flag, value..., output]`. The spec's `format`
//! field only picks the output extension and is never emitted as a flag.

use std::path::Path;

use attachmagick_core::{OptionValue, TransformSpec};

/// Build the full convert argument list for one transform.
///
/// Options are emitted in the spec's insertion order, each flag followed by
/// its scalar value or by every element of its sequence value.
///
/// Composite fix-up: convert expects a composite operation's first positional
/// operand to be the `-composite` token itself rather than the source path,
/// so when a `-composite` token is present the input path (position 0) and
/// the token swap places.
pub fn build_convert_args(input: &Path, spec: &TransformSpec, output: &Path) -> Vec<String> {
    let mut args = Vec::with_capacity(spec.options.len() * 2 + 2);
    args.push(input.to_string_lossy().into_owned());

    for (name, value) in &spec.options {
        args.push(format!("-{}", name));
        match value {
            OptionValue::Scalar(v) => args.push(v.clone()),
            OptionValue::List(vs) => args.extend(vs.iter().cloned()),
        }
    }

    args.push(output.to_string_lossy().into_owned());

    if let Some(pos) = args.iter().position(|a| a == "-composite") {
        args.swap(0, pos);
    }

    args
}
