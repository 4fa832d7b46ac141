//! Greedy merge of a single slice mask.

use crate::core::{Face, Quad};
use crate::cull::SliceMask;

/// Greedily tile one slice mask with maximal rectangles.
///
/// For each populated cell in row-major order: extend the width along `u`
/// while the next cell has the same descriptor, then extend the height
/// along `v` while every cell across the full width matches. The covered
/// cells are cleared so they are never reprocessed.
///
/// Consumes the mask: every cell is empty on return.
pub fn greedy_merge_slice(mask: &mut SliceMask, face: Face, slice: u32, output: &mut Vec<Quad>) {
    let (u_len, v_len) = (mask.u_len(), mask.v_len());

    for start_v in 0..v_len {
        for start_u in 0..u_len {
            let Some(descriptor) = mask.get(start_u, start_v) else {
                continue;
            };

            // Extend width in +U direction
            let mut width = 1;
            while start_u + width < u_len
                && mask.get(start_u + width, start_v) == Some(descriptor)
            {
                width += 1;
            }

            // Extend height in +V direction; the whole row must match
            let mut height = 1;
            'height_loop: while start_v + height < v_len {
                let next_v = start_v + height;
                for check_u in start_u..(start_u + width) {
                    if mask.get(check_u, next_v) != Some(descriptor) {
                        break 'height_loop;
                    }
                }
                height += 1;
            }

            mask.clear_rect(start_u, start_v, width, height);

            output.push(Quad {
                face,
                slice,
                u: start_u as u32,
                v: start_v as u32,
                width: width as u32,
                height: height as u32,
                descriptor,
            });
        }
    }
}
