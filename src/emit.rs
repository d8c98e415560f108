// Copyright 2025 Steven Dee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use core::fmt::{self, Display, Formatter};
use std::io::{Result, Write};

use limbgen_base::{
    BinStr,
    fmt::{LimbList, Lines, TestOut},
    limbs,
};
use limbgen_conf::{Case, Format, Sweep};
use num_bigint::BigUint;

/// A value paired with the format it should be printed in.
pub(crate) struct Rendered<'a>(pub Format, pub &'a BigUint);

impl Display for Rendered<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Format::Bin => write!(f, "{}", BinStr(self.1)),
            Format::Limbs => write!(f, "{}", LimbList(&limbs(self.1))),
            Format::TestOut => write!(f, "{}", TestOut(&limbs(self.1))),
        }
    }
}

pub(crate) fn write_values(w: &mut dyn Write, format: Format, values: &[BigUint]) -> Result<()> {
    let rendered = values.iter().map(|value| Rendered(format, value));
    write!(w, "{}", Lines(rendered))
}

/// Writes a case as `name<TAB>value`.
pub(crate) fn write_case(w: &mut dyn Write, case: &Case) -> Result<()> {
    tracing::debug!(name = %case.name, format = %case.format, bits = case.value.bits(), "case");
    writeln!(w, "{}\t{}", case.name, Rendered(case.format, &case.value))
}

/// Writes one line per step of the sweep.
pub(crate) fn write_sweep(w: &mut dyn Write, sweep: &Sweep, format: Format) -> Result<()> {
    tracing::info!(
        name = %sweep.name,
        start = %sweep.start,
        left = sweep.left,
        right = sweep.right,
        "sweep"
    );
    for value in sweep.values() {
        writeln!(w, "{}", Rendered(format, &value))?;
    }
    Ok(())
}
