//! OTA slot bookkeeping behind the firmware-validation capability.
//!
//! The bootloader leaves the freshly flashed slot in a pending state; the
//! display core calls `mark_valid` once the image has survived its boot
//! window. A reset before that point makes the bootloader fall back to the
//! previous slot, which surfaces here as a boot error on the next start.

use embedded_storage::{ReadStorage, Storage};
use esp_bootloader_esp_idf::ota::{Ota, OtaImageState};
use esp_bootloader_esp_idf::partitions::{
    self, DataPartitionSubType, PARTITION_TABLE_MAX_LEN, PartitionType,
};
use log::{info, warn};

use vigil_core::app::BootError;
use vigil_core::hw::FirmwareValidator;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OtaError {
    PartitionTable,
    OtaDataMissing,
    Flash,
}

pub struct OtaValidator<F> {
    flash: F,
    marked: bool,
}

impl<F> OtaValidator<F>
where
    F: ReadStorage + Storage,
{
    pub fn new(flash: F) -> Self {
        Self {
            flash,
            marked: false,
        }
    }

    /// Maps the image state the bootloader left behind onto the boot
    /// classification handed to the display core.
    pub fn classify_boot(&mut self) -> BootError {
        match self.with_ota(|ota| ota.current_ota_state()) {
            Ok(Ok(OtaImageState::Invalid)) | Ok(Ok(OtaImageState::Aborted)) => {
                BootError::FirmwareValidationFailed
            }
            Ok(_) => BootError::None,
            Err(err) => {
                // A board without OTA slots boots plainly.
                warn!("ota: state unavailable ({:?}), assuming clean boot", err);
                BootError::None
            }
        }
    }

    fn with_ota<R>(
        &mut self,
        f: impl FnOnce(&mut Ota<'_, partitions::FlashRegion<'_, F>>) -> R,
    ) -> Result<R, OtaError> {
        let mut buffer = [0u8; PARTITION_TABLE_MAX_LEN];
        let table = partitions::read_partition_table(&mut self.flash, &mut buffer)
            .map_err(|_| OtaError::PartitionTable)?;
        let entry = table
            .find_partition(PartitionType::Data(DataPartitionSubType::Ota))
            .map_err(|_| OtaError::PartitionTable)?
            .ok_or(OtaError::OtaDataMissing)?;
        let mut region = entry.as_embedded_storage(&mut self.flash);
        let mut ota = Ota::new(&mut region).map_err(|_| OtaError::Flash)?;
        Ok(f(&mut ota))
    }
}

impl<F> FirmwareValidator for OtaValidator<F>
where
    F: ReadStorage + Storage,
{
    fn mark_valid(&mut self) {
        if self.marked {
            return;
        }
        match self.with_ota(|ota| ota.set_current_ota_state(OtaImageState::Valid)) {
            Ok(Ok(())) => {
                info!("ota: running slot marked valid");
                self.marked = true;
            }
            Ok(Err(_)) | Err(_) => warn!("ota: could not mark running slot valid"),
        }
    }
}
