use crate::artifacts::index::CHECKSUM_SIZE;
use anyhow::anyhow;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};

/// Hashing wrapper around the index file handle
///
/// Mirrors every read and write into a running SHA-1 digest so the trailing
/// checksum can be verified on load and emitted on store.
#[derive(Debug)]
pub struct Checksum<F> {
    file: F,
    digest: Sha1,
}

impl<F> Checksum<F> {
    pub(crate) fn new(file: F) -> Self {
        Checksum {
            file,
            digest: Sha1::new(),
        }
    }
}

impl<F: Read> Checksum<F> {
    pub(crate) fn read(&mut self, size: usize) -> anyhow::Result<Bytes> {
        let mut buffer = vec![0; size];
        self.file
            .read_exact(&mut buffer)
            .map_err(|_| anyhow!("Unexpected end-of-file while reading index"))?;

        self.digest.update(&buffer);
        Ok(Bytes::from(buffer))
    }

    pub(crate) fn verify(&mut self) -> anyhow::Result<()> {
        let mut expected_checksum = [0u8; CHECKSUM_SIZE];
        self.file.read_exact(&mut expected_checksum)?;

        let actual_checksum = self.digest.clone().finalize();
        let actual_checksum = actual_checksum.as_slice();

        if expected_checksum != actual_checksum {
            return Err(anyhow!("Checksum does not match value stored on disk"));
        }

        Ok(())
    }
}

impl<F: Write> Checksum<F> {
    pub(crate) fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.file.write_all(data)?;
        self.digest.update(data);
        Ok(())
    }

    pub(crate) fn write_checksum(&mut self) -> anyhow::Result<()> {
        let checksum = self.digest.clone().finalize();
        self.file
            .write_all(checksum.as_slice())
            .map_err(|_| anyhow!("Failed to write checksum to index file"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_data_verifies_against_its_own_checksum() {
        let mut buffer = Vec::new();
        {
            let mut writer = Checksum::new(&mut buffer);
            writer.write(b"some index bytes").unwrap();
            writer.write_checksum().unwrap();
        }

        let mut reader = Checksum::new(std::io::Cursor::new(buffer));
        reader.read(16).unwrap();
        assert!(reader.verify().is_ok());
    }

    #[test]
    fn corrupted_data_fails_verification() {
        let mut buffer = Vec::new();
        {
            let mut writer = Checksum::new(&mut buffer);
            writer.write(b"some index bytes").unwrap();
            writer.write_checksum().unwrap();
        }
        buffer[3] ^= 0xff;

        let mut reader = Checksum::new(std::io::Cursor::new(buffer));
        reader.read(16).unwrap();
        assert!(reader.verify().is_err());
    }
}
