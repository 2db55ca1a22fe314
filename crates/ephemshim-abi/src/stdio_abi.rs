//! No-op `<stdio.h>` formatted output.
//!
//! None of these stubs read the format string, the variadic arguments, the
//! destination buffer or the stream. They report zero bytes written.

use std::ffi::{c_char, c_int, c_void};

use ephemshim_core::StubSymbol;
use ephemshim_core::suppress::suppress_format;

/// `printf` stub: writes nothing, returns 0.
#[cfg_attr(all(feature = "interpose", not(test)), unsafe(no_mangle))]
#[cfg_attr(
    all(feature = "linker-wrap", not(test)),
    unsafe(export_name = "__wrap_printf")
)]
pub unsafe extern "C" fn printf(_format: *const c_char, _args: ...) -> c_int {
    suppress_format(StubSymbol::Printf)
}

/// `fprintf` stub: `stream` is never dereferenced, returns 0.
#[cfg_attr(all(feature = "interpose", not(test)), unsafe(no_mangle))]
#[cfg_attr(
    all(feature = "linker-wrap", not(test)),
    unsafe(export_name = "__wrap_fprintf")
)]
pub unsafe extern "C" fn fprintf(
    _stream: *mut c_void,
    _format: *const c_char,
    _args: ...
) -> c_int {
    suppress_format(StubSymbol::Fprintf)
}

/// `sprintf` stub: `str_buf` is left untouched (not even NUL-terminated), returns 0.
#[cfg_attr(all(feature = "interpose", not(test)), unsafe(no_mangle))]
#[cfg_attr(
    all(feature = "linker-wrap", not(test)),
    unsafe(export_name = "__wrap_sprintf")
)]
pub unsafe extern "C" fn sprintf(
    _str_buf: *mut c_char,
    _format: *const c_char,
    _args: ...
) -> c_int {
    suppress_format(StubSymbol::Sprintf)
}

/// `snprintf` stub: `str_buf` is left untouched for every `size`, returns 0.
#[cfg_attr(all(feature = "interpose", not(test)), unsafe(no_mangle))]
#[cfg_attr(
    all(feature = "linker-wrap", not(test)),
    unsafe(export_name = "__wrap_snprintf")
)]
pub unsafe extern "C" fn snprintf(
    _str_buf: *mut c_char,
    _size: usize,
    _format: *const c_char,
    _args: ...
) -> c_int {
    suppress_format(StubSymbol::Snprintf)
}
