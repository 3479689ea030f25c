//! VM placement onto the hosts of a single datacenter.
//!
//! Uses the simple allocation policy: each VM goes to the host with the most
//! free PEs among those that can still fit it, lowest host index on ties.
//! A VM that fits nowhere is reported as failed and never becomes a worker.

use std::cmp::Reverse;
use std::collections::HashMap;

use cloudlb_core::{Worker, WorkerId};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::host::Host;

/// Result of provisioning a list of VMs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Provisioned {
    /// Successfully created workers, in request order.
    pub created: Vec<Worker>,
    pub failed: Vec<WorkerId>,
}

#[derive(Debug, Clone)]
pub struct Datacenter {
    pub id: u32,
    pub name: String,
    hosts: Vec<Host>,
    /// Worker id → index into `hosts`.
    placements: HashMap<WorkerId, usize>,
}

impl Datacenter {
    pub fn new(id: u32, name: impl Into<String>, hosts: Vec<Host>) -> Self {
        Self {
            id,
            name: name.into(),
            hosts,
            placements: HashMap::new(),
        }
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    /// Host currently running `worker`.
    pub fn host_of(&self, worker: WorkerId) -> Option<&Host> {
        self.placements.get(&worker).map(|&i| &self.hosts[i])
    }

    fn select_host(&self, vm: &Worker) -> Option<usize> {
        self.hosts
            .iter()
            .enumerate()
            .filter(|(_, h)| h.can_host(vm))
            .max_by_key(|(i, h)| (h.free_pes(), Reverse(*i)))
            .map(|(i, _)| i)
    }

    /// Place every VM, in order.
    pub fn create_vms(&mut self, vms: Vec<Worker>) -> Provisioned {
        let mut provisioned = Provisioned::default();

        for vm in vms {
            if self.placements.contains_key(&vm.id) {
                warn!(vm = vm.id, datacenter = %self.name, "VM id already placed, skipping");
                provisioned.failed.push(vm.id);
                continue;
            }

            let Some(index) = self.select_host(&vm) else {
                warn!(
                    vm = vm.id,
                    datacenter = %self.name,
                    mips = vm.mips,
                    ram_mb = vm.ram_mb,
                    "no host can fit VM"
                );
                provisioned.failed.push(vm.id);
                continue;
            };

            // select_host only returns hosts that pass can_host.
            let allocated = self.hosts[index].allocate(&vm);
            debug_assert!(allocated);

            debug!(vm = vm.id, host = self.hosts[index].id, "VM created");
            self.placements.insert(vm.id, index);
            provisioned.created.push(vm);
        }

        info!(
            datacenter = %self.name,
            created = provisioned.created.len(),
            failed = provisioned.failed.len(),
            "VM provisioning finished"
        );
        provisioned
    }
}
