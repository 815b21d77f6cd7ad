//! Emulated programs, one module per tool family.
//!
//! Each handler validates the whole call shape before producing its first side effect, so a
//! rejected invocation never leaves partial output behind.

mod bash;
mod bcftools;
mod bedtools;
mod capmq;
mod java;
mod python;
mod samtools;
mod seq_cache;
mod sh;
mod verifybamid;

use crate::dispatch::Registry;

pub fn register_all(registry: &mut Registry) {
    registry.register(bash::Bash);
    registry.register(bcftools::Bcftools);
    registry.register(bedtools::Bedtools);
    registry.register(capmq::Capmq);
    registry.register(java::Java);
    registry.register(python::Python);
    registry.register(python::Python3);
    registry.register(samtools::Samtools);
    registry.register(seq_cache::SeqCachePopulate);
    registry.register(sh::Sh);
    registry.register(verifybamid::VerifyBamIdRg);
}

/// First argument, or `""` when there is none.
fn subcommand(args: &[String]) -> &str {
    args.first().map(String::as_str).unwrap_or("")
}
