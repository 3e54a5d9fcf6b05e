// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

mod pixel;
mod reference;

pub use pixel::{COMPOUND_OFFSET, Pixel};
pub use reference::{REFERENCE_BORDER_AFTER, REFERENCE_BORDER_BEFORE, ReferenceBlock};
