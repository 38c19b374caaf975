use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use crate::error::BuildError;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const GLB_HEADER_LEN: usize = 12;

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}

/// Binary glTF header: magic, container version 2, declared length equal to
/// the file size. `header` is the start of the file, at most 12 bytes are read.
pub fn validate_glb(header: &[u8], file_len: u64) -> Result<(), String> {
    if header.len() < GLB_HEADER_LEN {
        return Err(format!("file is {} bytes, shorter than a GLB header", file_len));
    }
    if &header[0..4] != GLB_MAGIC {
        return Err("missing glTF magic".to_string());
    }

    let version = read_u32_le(header, 4);
    if version != GLB_VERSION {
        return Err(format!("unsupported GLB version {}", version));
    }

    let declared = u64::from(read_u32_le(header, 8));
    if declared != file_len {
        return Err(format!(
            "header declares {} bytes but file has {}",
            declared, file_len
        ));
    }
    Ok(())
}

/// JSON glTF: parses and declares an `asset.version` of 2.x.
pub fn validate_gltf_json(bytes: &[u8]) -> Result<(), String> {
    let document: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| format!("invalid JSON: {}", e))?;

    match document.pointer("/asset/version").and_then(|v| v.as_str()) {
        Some(version) if version.starts_with('2') => Ok(()),
        Some(version) => Err(format!("unsupported glTF version {}", version)),
        None => Err("missing asset.version".to_string()),
    }
}

pub fn validate_model(path: &Path) -> Result<(), BuildError> {
    let is_binary = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("glb"));

    let result = if is_binary {
        let file = File::open(path).map_err(|e| BuildError::io(path, e))?;
        let file_len = file.metadata().map_err(|e| BuildError::io(path, e))?.len();
        let mut header = Vec::with_capacity(GLB_HEADER_LEN);
        file.take(GLB_HEADER_LEN as u64)
            .read_to_end(&mut header)
            .map_err(|e| BuildError::io(path, e))?;
        validate_glb(&header, file_len)
    } else {
        let bytes = fs::read(path).map_err(|e| BuildError::io(path, e))?;
        validate_gltf_json(&bytes)
    };
    result.map_err(|reason| BuildError::invalid(path, reason))
}
