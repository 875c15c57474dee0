use std::io::{self, Read};

pub(crate) trait ValueReaderExt
where
    Self: Read + Sized,
{
    fn read_value<T: Readable>(&mut self) -> io::Result<T>;
}
pub(crate) trait Readable {
    fn read_from_reader<R: Read>(reader: &mut R) -> io::Result<Self>
    where
        Self: Sized;
}

impl<R: Read + Sized> ValueReaderExt for R {
    fn read_value<T: Readable>(&mut self) -> io::Result<T>
    where
        T: Readable,
    {
        T::read_from_reader(self)
    }
}

impl<const N: usize> Readable for [u8; N] {
    fn read_from_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; N];
        reader.read_exact(&mut buf)?;
        Ok(buf)
    }
}

macro_rules! impl_readable_for {
    ($($t:ty),*) => {
        $(
            impl Readable for $t {
                fn read_from_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
                    let buf = reader.read_value()?;
                    Ok(Self::from_be_bytes(buf))
                }
            }
        )*
    };
}

impl_readable_for!(u8, u16, u32);

/// Reads [len] bytes and advances the reader by [`len`] bytes.
pub(crate) fn read_byte_chunk<R>(reader: &mut R, len: usize) -> io::Result<Vec<u8>>
where
    R: Read,
{
    let mut buf = vec![0u8; len];
    reader.read_exact(buf.as_mut_slice())?;
    Ok(buf)
}

/// Advances the reader by [`len`] bytes without keeping them.
pub(crate) fn skip_bytes<R>(reader: &mut R, len: u64) -> io::Result<()>
where
    R: Read,
{
    let skipped = io::copy(&mut reader.take(len), &mut io::sink())?;
    if skipped == len {
        Ok(())
    } else {
        Err(io::Error::from(io::ErrorKind::UnexpectedEof))
    }
}

#[cfg(test)]
mod test {
    use super::{ValueReaderExt, skip_bytes};

    #[test]
    fn read_bytes_success() {
        let mut reader = [0x01u8, 0x02, 0x03, 0x04].as_slice();
        let buf: [u8; 3] = reader.read_value().unwrap();
        assert_eq!(buf, [0x01, 0x02, 0x03]);
        assert_eq!(reader, [0x04u8]);
    }

    #[test]
    fn read_bytes_failed() {
        let mut reader = [0x01u8, 0x02].as_slice();
        let buf: std::io::Result<[u8; 3]> = reader.read_value();
        assert!(buf.is_err());
    }

    #[test]
    fn read_big_endian() {
        let mut reader = [0xCAu8, 0xFE, 0xBA, 0xBE, 0x00, 0x2A].as_slice();
        let magic: u32 = reader.read_value().unwrap();
        let answer: u16 = reader.read_value().unwrap();
        assert_eq!(magic, 0xCAFE_BABE);
        assert_eq!(answer, 42);
    }

    #[test]
    fn skip_past_end() {
        let mut reader = [0x01u8, 0x02].as_slice();
        assert!(skip_bytes(&mut reader, 1).is_ok());
        assert_eq!(reader, [0x02u8]);
        assert!(skip_bytes(&mut reader, 2).is_err());
    }
}
