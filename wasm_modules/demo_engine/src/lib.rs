// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Demo computation engine for puzzle-bridge.
//!
//! Implements the engine ABI for one puzzle (a list-distance puzzle on day 1)
//! so the bridge can be run end to end. Any other day panics, which reaches
//! the host through `report_fault` as an out-of-band fault.

use serde::Serialize;

#[link(wasm_import_module = "env")]
extern "C" {
    fn report_fault(ptr: *const u8, len: usize);
}

#[derive(Serialize)]
struct Response {
    result: Option<String>,
    error: Option<String>,
}

/// Route panic messages to the host before the abort traps.
#[no_mangle]
pub extern "C" fn init_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = info.to_string();
        unsafe { report_fault(message.as_ptr(), message.len()) };
    }));
}

#[no_mangle]
pub extern "C" fn allocate(size: usize) -> *mut u8 {
    let mut buf = Vec::with_capacity(size);
    let ptr = buf.as_mut_ptr();
    std::mem::forget(buf);
    ptr
}

/// # Safety
/// `ptr` must come from `allocate(size)` or be a response returned by `solve_day`.
#[no_mangle]
pub unsafe extern "C" fn deallocate(ptr: *mut u8, size: usize) {
    let _ = Vec::from_raw_parts(ptr, 0, size);
}

/// # Safety
/// `input_ptr..input_ptr+input_len` must be readable and `output_len_ptr`
/// must point to four writable bytes.
#[no_mangle]
pub unsafe extern "C" fn solve_day(
    day: u32,
    part: u32,
    input_ptr: *const u8,
    input_len: usize,
    output_len_ptr: *mut u32,
) -> *mut u8 {
    let bytes = std::slice::from_raw_parts(input_ptr, input_len);
    let response = match std::str::from_utf8(bytes) {
        Ok(input) => match solve(day, part, input.trim()) {
            Ok(answer) => Response {
                result: Some(answer),
                error: None,
            },
            Err(error) => Response {
                result: None,
                error: Some(error),
            },
        },
        Err(e) => Response {
            result: None,
            error: Some(format!("input is not UTF-8: {}", e)),
        },
    };

    let json = serde_json::to_vec(&response).unwrap_or_default();
    let boxed = json.into_boxed_slice();
    *output_len_ptr = boxed.len() as u32;
    Box::leak(boxed).as_mut_ptr()
}

fn solve(day: u32, part: u32, input: &str) -> Result<String, String> {
    match (day, part) {
        (1, 1) => {
            let (mut left, mut right) = parse_columns(input)?;
            left.sort_unstable();
            right.sort_unstable();
            let distance: u64 = left.iter().zip(&right).map(|(l, r)| l.abs_diff(*r)).sum();
            Ok(distance.to_string())
        }
        (1, 2) => {
            let (left, right) = parse_columns(input)?;
            let similarity: u64 = left
                .iter()
                .map(|l| l * right.iter().filter(|r| *r == l).count() as u64)
                .sum();
            Ok(similarity.to_string())
        }
        _ => panic!("Day {} Part {} not included", day, part),
    }
}

fn parse_columns(input: &str) -> Result<(Vec<u64>, Vec<u64>), String> {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (n, line) in input.lines().enumerate() {
        let mut fields = line.split_whitespace().map(str::parse::<u64>);
        match (fields.next(), fields.next()) {
            (Some(Ok(l)), Some(Ok(r))) => {
                left.push(l);
                right.push(r);
            }
            _ => return Err(format!("line {}: expected two numbers", n + 1)),
        }
    }
    Ok((left, right))
}
