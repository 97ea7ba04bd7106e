use qegui_common::DecodeError;

/// Cursor over a payload body. Every read names the field it is reading so
/// a truncated payload reports where it ran out.
pub(super) struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub(super) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if self.buf.len() < n {
            return Err(DecodeError::Truncated { field });
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    pub(super) fn u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.take(1, field)?[0])
    }

    pub(super) fn flag(&mut self, field: &'static str) -> Result<bool, DecodeError> {
        Ok(self.u8(field)? != 0)
    }

    pub(super) fn f64(&mut self, field: &'static str) -> Result<f64, DecodeError> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.take(8, field)?);
        Ok(f64::from_le_bytes(raw))
    }

    pub(super) fn string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let end = self
            .buf
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::Truncated { field })?;
        let raw = self.take(end + 1, field)?;
        std::str::from_utf8(&raw[..end])
            .map(str::to_string)
            .map_err(|_| DecodeError::InvalidText { field })
    }

    pub(super) fn list(&mut self, field: &'static str) -> Result<Vec<String>, DecodeError> {
        let count = self.u8(field)?;
        (0..count).map(|_| self.string(field)).collect()
    }
}
