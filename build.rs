/********************************************************************************
 * Copyright (c) 2023 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use std::path::Path;

const PROTO_INCLUDE_DIR: &str = "up-spec/up-core-api";
const PROTO_SOURCE_DIR: &str = "up-spec/up-core-api/uprotocol";

fn main() -> std::io::Result<()> {
    let proto_dir = Path::new(PROTO_SOURCE_DIR);
    let mut proto_files: Vec<_> = std::fs::read_dir(proto_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "proto").unwrap_or(false))
        .collect();
    // sort for reproducible build output across platforms
    proto_files.sort();

    println!("cargo:rerun-if-changed={PROTO_SOURCE_DIR}");

    protobuf_codegen::Codegen::new()
        .pure()
        .protoc()
        .protoc_path(&protoc_bin_vendored::protoc_bin_path().expect(
            "the vendored protoc binary should be available for the current target platform",
        ))
        .include(PROTO_INCLUDE_DIR)
        .inputs(&proto_files)
        .cargo_out_dir("uprotocol")
        .run_from_script();

    Ok(())
}
