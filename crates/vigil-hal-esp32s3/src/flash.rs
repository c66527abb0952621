//! Raw SPI flash access through the ROM routines, exposed through the
//! `embedded-storage` traits so the OTA bookkeeping can run over it.

use embedded_storage::{ReadStorage, Storage};
use esp_rom_sys::rom::spiflash::{
    ESP_ROM_SPIFLASH_RESULT_OK, esp_rom_spiflash_erase_sector, esp_rom_spiflash_read,
    esp_rom_spiflash_unlock, esp_rom_spiflash_write,
};

const FLASH_SECTOR_SIZE: u32 = 4096;
const DEFAULT_FLASH_CAPACITY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FlashError {
    OpFailed(i32),
    Unsupported,
}

#[derive(Debug)]
pub struct RawFlash;

impl RawFlash {
    pub fn new() -> Result<Self, FlashError> {
        let rc = unsafe { esp_rom_spiflash_unlock() };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashError::OpFailed(rc));
        }
        Ok(Self)
    }

    fn erase_sector(&mut self, sector_addr: u32) -> Result<(), FlashError> {
        if !sector_addr.is_multiple_of(FLASH_SECTOR_SIZE) {
            return Err(FlashError::Unsupported);
        }

        let sector = sector_addr / FLASH_SECTOR_SIZE;
        let rc = unsafe { esp_rom_spiflash_erase_sector(sector) };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashError::OpFailed(rc));
        }
        Ok(())
    }

    fn read_word(&mut self, addr: u32) -> Result<u32, FlashError> {
        if !addr.is_multiple_of(4) {
            return Err(FlashError::Unsupported);
        }

        let mut word = 0u32;
        let rc = unsafe { esp_rom_spiflash_read(addr, &mut word as *mut u32 as *const u32, 4) };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashError::OpFailed(rc));
        }
        Ok(word)
    }

    fn write_word(&mut self, addr: u32, word: u32) -> Result<(), FlashError> {
        if !addr.is_multiple_of(4) {
            return Err(FlashError::Unsupported);
        }

        let rc = unsafe { esp_rom_spiflash_write(addr, &word as *const u32, 4) };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashError::OpFailed(rc));
        }
        Ok(())
    }
}

impl ReadStorage for RawFlash {
    type Error = FlashError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let mut cached: Option<(u32, u32)> = None;
        for (i, out) in bytes.iter_mut().enumerate() {
            let addr = offset + i as u32;
            let word_addr = addr & !3;
            let word = match cached {
                Some((cached_addr, word)) if cached_addr == word_addr => word,
                _ => {
                    let word = self.read_word(word_addr)?;
                    cached = Some((word_addr, word));
                    word
                }
            };
            *out = word.to_le_bytes()[(addr & 3) as usize];
        }
        Ok(())
    }

    fn capacity(&self) -> usize {
        DEFAULT_FLASH_CAPACITY_BYTES
    }
}

impl Storage for RawFlash {
    // Sector read-modify-write: NOR flash only clears bits on write, so the
    // enclosing sector is erased and replayed around the new bytes.
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let mut written = 0usize;
        while written < bytes.len() {
            let addr = offset + written as u32;
            let sector_base = addr - (addr % FLASH_SECTOR_SIZE);
            let in_sector = (addr - sector_base) as usize;
            let take = (bytes.len() - written).min(FLASH_SECTOR_SIZE as usize - in_sector);

            let mut sector = [0u8; FLASH_SECTOR_SIZE as usize];
            self.read(sector_base, &mut sector)?;
            sector[in_sector..in_sector + take].copy_from_slice(&bytes[written..written + take]);

            self.erase_sector(sector_base)?;
            for (i, chunk) in sector.chunks_exact(4).enumerate() {
                let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                self.write_word(sector_base + (i as u32) * 4, word)?;
            }

            written += take;
        }
        Ok(())
    }
}
