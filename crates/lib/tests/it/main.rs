/*! Integration tests for confdata.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - element: Tests for the Element tree, its accessor protocol, and
 *   recursive lookup
 * - text: Tests for the textual notation (parser and renderer)
 * - wire: Tests for the binary wire format (encoder and decoder)
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("confdata=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}
