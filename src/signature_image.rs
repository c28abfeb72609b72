use crate::Error;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Decode a `data:image/png;base64,...` URL into PNG bytes.
///
/// Everything up to the first comma is ignored, like browsers' `toDataURL` output expects.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, Error> {
    let (_, encoded) = data_url
        .split_once(',')
        .ok_or_else(|| Error::SignatureData("missing data URL prefix".to_owned()))?;
    let decoded = base64::decode(encoded.trim())?;
    if !decoded.starts_with(PNG_MAGIC) {
        return Err(Error::SignatureData("signature is not a PNG image".to_owned()));
    }
    Ok(decoded)
}
