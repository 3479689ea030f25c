//! Physical machines that host workers.

use cloudlb_core::{Worker, WorkerId};
use serde::{Deserialize, Serialize};

/// Static capacity and current usage of a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub id: u32,
    pub pes: u32,
    /// Rate of each PE, in MIPS.
    pub mips: u32,
    pub ram_mb: u64,
    pub bw: u64,
    pub storage_mb: u64,

    used_pes: u32,
    used_ram_mb: u64,
    used_bw: u64,
    used_storage_mb: u64,
    vms: Vec<WorkerId>,
}

impl Host {
    pub fn new(id: u32, pes: u32, mips: u32, ram_mb: u64, bw: u64, storage_mb: u64) -> Self {
        Self {
            id,
            pes,
            mips,
            ram_mb,
            bw,
            storage_mb,
            used_pes: 0,
            used_ram_mb: 0,
            used_bw: 0,
            used_storage_mb: 0,
            vms: Vec::new(),
        }
    }

    pub fn free_pes(&self) -> u32 {
        self.pes.saturating_sub(self.used_pes)
    }

    pub fn free_ram_mb(&self) -> u64 {
        self.ram_mb.saturating_sub(self.used_ram_mb)
    }

    pub fn free_bw(&self) -> u64 {
        self.bw.saturating_sub(self.used_bw)
    }

    pub fn free_storage_mb(&self) -> u64 {
        self.storage_mb.saturating_sub(self.used_storage_mb)
    }

    pub fn vms(&self) -> &[WorkerId] {
        &self.vms
    }

    /// Whether `vm` fits in what is left of this host.
    pub fn can_host(&self, vm: &Worker) -> bool {
        vm.pes <= self.free_pes()
            && vm.mips <= self.mips
            && u64::from(vm.ram_mb) <= self.free_ram_mb()
            && vm.bw <= self.free_bw()
            && vm.size_mb <= self.free_storage_mb()
    }

    /// Reserve resources for `vm`. Returns false and changes nothing if it
    /// does not fit.
    pub fn allocate(&mut self, vm: &Worker) -> bool {
        if !self.can_host(vm) {
            return false;
        }
        self.used_pes += vm.pes;
        self.used_ram_mb += u64::from(vm.ram_mb);
        self.used_bw += vm.bw;
        self.used_storage_mb += vm.size_mb;
        self.vms.push(vm.id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vm(id: WorkerId) -> Worker {
        Worker {
            id,
            mips: 250,
            pes: 1,
            ram_mb: 512,
            bw: 1000,
            size_mb: 10_000,
        }
    }

    #[test]
    fn allocation_consumes_resources() {
        let mut host = Host::new(0, 2, 1000, 2048, 10_000, 1_000_000);
        assert!(host.allocate(&vm(0)));

        assert_eq!(host.free_pes(), 1);
        assert_eq!(host.free_ram_mb(), 1536);
        assert_eq!(host.free_bw(), 9000);
        assert_eq!(host.free_storage_mb(), 990_000);
        assert_eq!(host.vms(), &[0]);
    }

    #[test]
    fn rejects_when_pes_exhausted() {
        let mut host = Host::new(0, 1, 1000, 4096, 10_000, 1_000_000);
        assert!(host.allocate(&vm(0)));
        assert!(!host.can_host(&vm(1)));
        assert!(!host.allocate(&vm(1)));
        assert_eq!(host.vms(), &[0]);
    }

    #[test]
    fn rejects_vm_faster_than_host_pe() {
        let host = Host::new(0, 4, 200, 4096, 10_000, 1_000_000);
        assert!(!host.can_host(&vm(0)));
    }

    #[test]
    fn rejects_insufficient_ram() {
        let host = Host::new(0, 4, 1000, 256, 10_000, 1_000_000);
        assert!(!host.can_host(&vm(0)));
    }
}
